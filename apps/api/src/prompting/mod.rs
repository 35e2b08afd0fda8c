// Prompt assembly for the reply / improve generator.
// Tone resolution goes through the ToneLookup seam; rendering itself is pure.

pub mod compiler;
pub mod handlers;
pub mod prompts;
pub mod request;
pub mod tone;
