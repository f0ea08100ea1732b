pub mod model_provider;
pub mod gemini;
