//! Tabulation services: line classification, table assembly, and
//! workbook emission.

pub mod classifier;
pub mod collector;
pub mod report_writer;

#[cfg(test)]
pub mod tests;

pub use classifier::LineClassifier;
pub use collector::DataCollector;
