// Copyright 2025 The kmesh Authors
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
//

pub mod http;
pub mod stability;

pub use crate::http::{ConfigError, HttpExtractionConfig};
pub use crate::stability::SemconvStability;

use serde::de::DeserializeOwned;
use std::{fs::File, path::Path};

/// Deserializes a configuration value from a YAML file.
pub fn deserialize_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = File::open(path).map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
    serde_yaml::from_reader(file).map_err(ConfigError::Yaml)
}
