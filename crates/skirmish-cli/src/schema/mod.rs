pub mod training_summary;
