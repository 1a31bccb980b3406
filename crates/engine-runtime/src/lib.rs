pub mod connectors;
pub mod error;
pub mod spec;

#[cfg(test)]
mod tests;
