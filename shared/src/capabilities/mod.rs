pub mod document;
pub mod http;
pub mod kv;
pub mod timer;

pub use self::document::{Document, DocumentOperation};
pub use self::http::{HttpResult, MultipartForm};
pub use self::kv::KvResult;
pub use self::timer::{Timer, TimerOperation, TimerOutput};

pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

use crate::event::Event;
// The Effect derive resolves the app type by this name.
use crate::App;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub kv: KeyValue<Event>,
    pub document: Document<Event>,
    pub timer: Timer<Event>,
    pub render: Render<Event>,
}
