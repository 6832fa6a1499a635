//! Application services for task definition and scheduling.

mod scheduling;

pub use scheduling::{
    CreateTaskRequest, TaskSchedulingError, TaskSchedulingResult, TaskSchedulingService,
};
