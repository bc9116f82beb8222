pub mod state;

pub use state::{
    label_of, label_of_code, ChineseLabels, EnglishLabels, JobState, Labels, Locale, StateError,
};
