pub mod consumer;
pub mod error;
pub mod producer;

#[cfg(test)]
mod tests;
