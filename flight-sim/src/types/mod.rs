pub mod alerts;

pub mod sim_error;

pub mod telemetry;

pub mod ticker;

pub mod updater;
