pub mod openai_embedding;
