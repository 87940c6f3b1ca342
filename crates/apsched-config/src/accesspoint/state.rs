/// Mutable, driver-editable state alongside the immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct ApState {
    /// Operator switch: suspend uplink solicitation without reloading the
    /// configuration. The scheduler falls back to downlink-only plans.
    pub ul_mu_suspended: bool,
}
