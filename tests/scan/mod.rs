//! End-to-end scans through the detector.

mod artifacts;
mod concurrency;
mod determinism;
mod end_to_end;
mod intel_gate;
