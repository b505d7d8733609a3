//! Watch one device from the command line: pull its state, then print
//! every fragment the engine pushes at the view as updates arrive.
//!
//! ```sh
//! GATEWAY=http://gateway.local JWT=... cargo run --example watch
//! ```

use lantern::{
    RenderMode, Session,
    detail::{Fragment, ImageHandle, NodeId, Renderer},
};

struct PrintRenderer {
    nodes: u64,
    images: u64,
}

impl Renderer for PrintRenderer {
    fn mount(&mut self, fragment: &Fragment) -> NodeId {
        self.nodes += 1;
        println!("mount #{}: {fragment:?}", self.nodes);
        NodeId(self.nodes)
    }

    fn apply(&mut self, node: NodeId, fragment: &Fragment) {
        println!("update #{}: {fragment:?}", node.0);
    }

    fn create_image(&mut self, bytes: &[u8]) -> ImageHandle {
        self.images += 1;
        println!("image #{} ({} bytes)", self.images, bytes.len());
        ImageHandle(self.images)
    }

    fn release_image(&mut self, handle: ImageHandle) {
        println!("released image #{}", handle.0);
    }
}

#[tokio::main]
async fn main() {
    lantern::log::init();

    let origin = std::env::var("GATEWAY").unwrap_or_else(|_| "http://gateway.local".to_owned());
    let token = std::env::var("JWT").unwrap_or_default();

    let session = Session::new(&origin, &token).unwrap();

    let description = serde_json::from_value(serde_json::json!({
        "name": "Desk Lamp",
        "type": "dimmableTemperatureLight",
        "href": "/things/desk-lamp",
        "properties": {
            "on": { "href": "/things/desk-lamp/properties/on", "type": "boolean" },
            "level": { "href": "/things/desk-lamp/properties/level", "type": "number" },
            "temperature": { "href": "/things/desk-lamp/properties/temperature",
                             "type": "string" },
        },
    }))
    .unwrap();

    let renderer = PrintRenderer { nodes: 0, images: 0 };
    let mut entity = session
        .entity(&description, RenderMode::Detail, Box::new(renderer))
        .unwrap();

    entity.mount_details();
    entity.run().await.unwrap();
}
