pub mod column;
pub mod convert;
pub mod insight;
pub mod raw;
pub mod stats;
pub mod task;
