pub mod poll {
    pub const INITIAL_DELAY_MS: u64 = 3_000;
    pub const MULTIPLIER: f64 = 2.0;
    pub const MAX_DELAY_MS: u64 = 240_000;
    pub const MAX_RETRIES: usize = 10;
    pub const DEADLINE_MS: u64 = 1_800_000;
}

pub mod network {
    pub const TIMEOUT_REQUEST_MS: u64 = 30_000;
}
