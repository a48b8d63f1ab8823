//! Single-flight frame scheduling and composition.

mod coordinator;
mod frame;
mod scheduler;

pub use coordinator::{FrameSink, NullFrameSink, RenderCoordinator};
pub use frame::{
    build_calendar_panel, compose_frame, BenchmarkPanel, BenchmarkRow, CalendarCell,
    CalendarMonth, CalendarPanel, DashboardFrame, FrameInputs, SummaryMetrics,
};
pub use scheduler::RenderScheduler;
