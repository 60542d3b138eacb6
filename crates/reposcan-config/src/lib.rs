// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the reposcan worker: layered loading, validation, and
//! the secret fetch contract.

pub mod loader;
pub mod model;
pub mod secrets;
pub mod validation;

pub use loader::{load_config, load_config_from_str};
pub use model::AppConfig;
pub use secrets::{
    fetch_secret_by_name, SECRET_GITHUB_CLIENT_ID, SECRET_GITHUB_PRIVATE_KEY,
    SECRET_OPENAI_API_KEY,
};
pub use validation::validate_config;
