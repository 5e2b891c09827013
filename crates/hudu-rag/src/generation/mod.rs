//! Prompt assembly and answer generation

mod pipeline;
mod prompt;

pub use pipeline::{
    answer_general, postprocess_answer, AnsweringPipeline, ANSWER_BANNER, NOT_FOUND_MESSAGE,
};
pub use prompt::{PromptBuilder, HUDU_PROMPT_TEMPLATE};
