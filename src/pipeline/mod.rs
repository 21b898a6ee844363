//! Extraction scheduling and track assembly.

mod assembler;
mod scheduler;

pub use assembler::{AssemblyReport, TrackFailure, assemble_tracks, clip_files, speaker_directories};
pub use scheduler::{
    ExtractionPlan, ExtractionReport, SegmentFailure, SegmentTask, clip_file_name, plan_tasks,
    run_extraction,
};
