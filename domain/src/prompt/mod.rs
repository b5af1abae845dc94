//! Prompt templates
//!
//! - [`Gsm8kTemplate`]: generation, proposal, value and vote prompts for GSM8K
//! - [`VerifierTemplate`]: reasoning verification prompt

mod template;

pub use template::{Gsm8kTemplate, VerifierTemplate};
