// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `env_logger` setup for hosts and tests.

use env_logger::{Builder, Env};

/// Installs the global logger, honouring `RUST_LOG` and falling back to
/// `default_filter`.
///
/// Panics if a logger is already installed; hosts call this once at startup.
pub fn init(default_filter: &str) {
    Builder::from_env(Env::default().default_filter_or(default_filter)).init();
}

/// Installs a test-friendly logger, ignoring the error when one already exists.
pub fn try_init_for_tests() {
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
