pub mod calendar;
pub mod gallery;
pub mod lightbox;
pub mod submission;
pub mod timer;
pub mod validation;
pub mod wizard;
