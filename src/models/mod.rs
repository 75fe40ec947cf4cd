pub mod alexa;
pub mod menu;

pub use alexa::{AssistantRequest, AssistantResponse, OutputSpeech, ResponseBody, ResponseEnvelope};
pub use menu::FilteredMenu;
