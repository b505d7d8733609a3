//! The entity base: identity, transports, the authoritative property
//! store, and dispatch of inbound updates into capabilities and detail
//! bindings.

use std::{collections::BTreeMap, sync::Arc};

use compact_str::{CompactString, ToCompactString};
use futures::future::join_all;
use lantern_common::{DeviceDescription, EntityId, PropertyDescriptor, Value};
use reqwest::Url;
use serde_json::Value as Json;
use tokio::{task::AbortHandle, time::MissedTickBehavior};

use crate::{
    Error, Result, Session,
    capability::CapabilitySet,
    detail::{Detail, Renderer, binding_for},
    push::{PushChannel, PushEvent},
    registry::DeviceKind,
    store::{PropertyStore, UpdateSource},
    transport::{StatusBody, Transport},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Compact live tile.
    Tile,
    /// Expanded view, one detail binding per displayed property.
    Detail,
    /// Passive floorplan marker; no push channel, no detail bindings.
    Floorplan,
}

impl RenderMode {
    pub fn interactive(self) -> bool {
        !matches!(self, RenderMode::Floorplan)
    }
}

/// In-flight operations registered per entity, drained at teardown so
/// nothing outlives its owner.
#[derive(Default)]
struct Ops {
    handles: Vec<AbortHandle>,
}

impl Ops {
    fn register(&mut self, handle: AbortHandle) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

/// Client-side representation of one remote device.
pub struct Entity {
    session: Arc<Session>,
    transport: Arc<dyn Transport>,
    id: EntityId,
    name: CompactString,
    kind: DeviceKind,
    base: Url,
    floorplan: Option<(f64, f64)>,
    mode: RenderMode,
    descriptors: BTreeMap<CompactString, PropertyDescriptor>,
    store: PropertyStore,
    capabilities: CapabilitySet,
    details: Vec<Box<dyn Detail>>,
    renderer: Box<dyn Renderer>,
    push: Option<PushChannel>,
    ops: Ops,
}

enum Step {
    Push(PushEvent),
    Resync,
    Closed,
}

impl Entity {
    /// Interactive modes open the push channel here, so construction
    /// must happen within a tokio runtime for them.
    pub(crate) fn new(
        session: Arc<Session>,
        transport: Arc<dyn Transport>,
        description: &DeviceDescription,
        mode: RenderMode,
        renderer: Box<dyn Renderer>,
    ) -> Result<Entity> {
        let base = session.resource(&description.href)?;
        let id = EntityId::from_path(base.path())
            .ok_or_else(|| Error::BadHref(format!("no path segment in '{base}'")))?;

        let kind = DeviceKind::from_tag(&description.type_tag);
        let descriptors = description.properties.clone();

        let details: Vec<Box<dyn Detail>> = match mode {
            RenderMode::Detail => descriptors
                .iter()
                .filter_map(|(name, descriptor)| binding_for(name, descriptor))
                .collect(),
            _ => Vec::new(),
        };

        let mut ops = Ops::default();
        let push = if mode.interactive() {
            let endpoint = session.realtime_endpoint(&base)?;
            let channel = PushChannel::open(endpoint, session.options().reconnect.clone());
            ops.register(channel.abort_handle());
            Some(channel)
        } else {
            None
        };

        let floorplan = match (description.floorplan_x, description.floorplan_y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        };

        Ok(Entity {
            session,
            transport,
            id,
            name: description.name.clone(),
            capabilities: kind.capabilities(),
            kind,
            base,
            floorplan,
            mode,
            descriptors,
            store: PropertyStore::default(),
            details,
            renderer,
            push,
            ops,
        })
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn floorplan(&self) -> Option<(f64, f64)> {
        self.floorplan
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Mount every detail fragment into the view and attach the
    /// bindings to the resulting nodes.
    pub fn mount_details(&mut self) {
        for binding in &mut self.details {
            let node = self.renderer.mount(&binding.fragment(&self.store));
            binding.attach(node);
        }
    }

    /// Bulk-read every tracked property resource, wait for all reads to
    /// settle, then apply the successes as one atomic status update.
    /// Failed reads are logged and skipped. Returns how many fields
    /// were applied.
    pub async fn pull(&mut self) -> usize {
        let mut targets = Vec::new();
        for (name, href) in self.capabilities.pull_targets(&self.descriptors) {
            match self.session.resource(href) {
                Ok(resource) => targets.push((name.to_compact_string(), resource)),
                Err(e) => tracing::warn!(property = name, "bad property href: {e}"),
            }
        }

        if targets.is_empty() {
            return 0;
        }

        let transport = self.transport.clone();
        let reads = targets.iter().map(|(_, resource)| {
            let transport = transport.clone();
            async move { transport.read(resource).await }
        });
        let outcomes = join_all(reads).await;

        let mut merged = StatusBody::new();
        for ((name, _), outcome) in targets.iter().zip(outcomes) {
            match outcome {
                Ok(body) => merged.extend(body),
                Err(e) => tracing::warn!(property = %name, "pull read failed: {e}"),
            }
        }

        let applied = merged.len();
        if applied > 0 {
            self.apply_status(&merged, UpdateSource::Pull);
        }

        applied
    }

    /// The shared status-update hook: decode each field per its
    /// descriptor, stamp it into the store, route it to the tracking
    /// capabilities, then run a single view refresh pass.
    ///
    /// Unknown names, null values and undecodable payloads are dropped
    /// with a diagnostic; one bad field never blocks the rest.
    pub fn apply_status(&mut self, data: &StatusBody, source: UpdateSource) {
        let mut changed = false;

        for (name, raw) in data {
            let Some(descriptor) = self.descriptors.get(name.as_str()) else {
                tracing::debug!(property = %name, "ignoring update for unknown property");
                continue;
            };

            if raw.is_null() {
                tracing::debug!(property = %name, "ignoring null update");
                continue;
            }

            let value = match Value::decode(descriptor, raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(property = %name, "dropping undecodable update: {e}");
                    continue;
                }
            };

            self.store.apply(name, value.clone(), source);
            if let Err(e) =
                self.capabilities.apply(name, descriptor, &value, self.renderer.as_mut())
            {
                tracing::warn!(property = %name, "capability update failed: {e}");
            }
            changed = true;
        }

        if changed {
            self.refresh_views();
        }
    }

    /// Set one property on the device: coerce per declared kind, write,
    /// and on confirmation commit the *sent* value without a re-read.
    /// On any failure the store is left untouched.
    pub async fn set_property(&mut self, name: &str, input: Json) -> Result<()> {
        let descriptor = self
            .descriptors
            .get(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_compact_string()))?;
        let href = descriptor
            .href
            .as_deref()
            .ok_or_else(|| Error::NotWritable(name.to_compact_string()))?;

        let value = Value::coerce(descriptor, &input)?;
        let resource = self.session.resource(href)?;

        let mut body = StatusBody::new();
        body.insert(name.to_string(), value.to_wire());

        let status = match self.transport.write(&resource, &Json::Object(body)).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(property = name, "write failed: {e}");
                return Err(e);
            }
        };

        if status != 200 {
            tracing::error!(property = name, status, "write rejected");
            return Err(Error::WriteRejected { name: name.to_compact_string(), status });
        }

        self.store.apply(name, value.clone(), UpdateSource::Write);
        if let Err(e) = self.capabilities.apply(name, descriptor, &value, self.renderer.as_mut())
        {
            tracing::warn!(property = name, "capability update failed: {e}");
        }
        self.refresh_view(name);

        Ok(())
    }

    /// Drive the entity: initial bulk pull, then apply push frames as
    /// they arrive, re-pulling on reconnect and on the resync tick.
    /// Returns once there is nothing left to wait on.
    pub async fn run(&mut self) -> Result<()> {
        self.pull().await;

        let mut resync = self.session.options().resync_interval.map(|period| {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            let step = match (self.push.as_mut(), resync.as_mut()) {
                (Some(push), Some(interval)) => tokio::select! {
                    event = push.recv() => event.map(Step::Push).unwrap_or(Step::Closed),
                    _ = interval.tick() => Step::Resync,
                },
                (Some(push), None) => push.recv().await.map(Step::Push).unwrap_or(Step::Closed),
                (None, Some(interval)) => {
                    interval.tick().await;
                    Step::Resync
                }
                (None, None) => return Ok(()),
            };

            match step {
                Step::Push(PushEvent::Status(data)) => {
                    self.apply_status(&data, UpdateSource::Push);
                }
                Step::Push(PushEvent::Reconnected) => {
                    tracing::info!(entity = %self.id, "push channel reconnected, re-pulling");
                    self.pull().await;
                }
                Step::Resync => {
                    self.pull().await;
                }
                Step::Closed => {
                    tracing::warn!(entity = %self.id, "push channel closed");
                    self.push = None;
                }
            }
        }
    }

    /// Tear down: abort the push reader and every registered in-flight
    /// operation.
    pub fn close(&mut self) {
        self.ops.abort_all();
        self.push = None;
    }

    fn refresh_views(&mut self) {
        for binding in &mut self.details {
            binding.update(&self.store, self.renderer.as_mut());
        }
    }

    fn refresh_view(&mut self, name: &str) {
        for binding in &mut self.details {
            if binding.property() == name {
                binding.update(&self.store, self.renderer.as_mut());
            }
        }
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        self.ops.abort_all();
    }
}
