pub mod context;
pub mod extract;
pub mod prompts;
pub mod recommend;
pub mod research;
pub mod types;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;
