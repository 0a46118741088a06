mod probe_report;
mod stun_probe;

pub use probe_report::{ProbeError, ProbeReport};
pub use stun_probe::{StunProbe, probe_all, stun_check};
