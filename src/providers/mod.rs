pub mod nbp;

pub use nbp::NbpTransport;
