//! Driver configuration record and flag processing.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::error::{DriverError, Result};
use super::flags::*;
use super::options::DriverOptions;
use super::types::{Architecture, LabelKind};
use super::yaml_merge::merge_yaml_docs;

/// Server configuration assembled from driver flags.
///
/// Built once by [`Driver::from_options`] and read-only afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Driver {
    #[serde(skip)]
    pub access_token: String,

    pub image: Option<String>,
    pub image_id: Option<i64>,
    pub image_arch: Option<Architecture>,

    pub server_type: String,
    pub server_location: Option<String>,
    pub placement_group: Option<String>,

    pub ssh_user: String,
    pub ssh_port: u16,

    pub networks: Vec<String>,
    pub firewalls: Vec<String>,
    pub volumes: Vec<String>,

    pub use_private_network: bool,
    pub disable_public4: bool,
    pub disable_public6: bool,
    pub primary_ipv4: Option<String>,
    pub primary_ipv6: Option<String>,

    #[serde(skip)]
    user_data: Option<String>,
    pub user_data_file: Option<PathBuf>,

    pub server_labels: BTreeMap<String, String>,
    pub key_labels: BTreeMap<String, String>,

    /// Set when a flag that is deprecated for removal was used
    #[serde(rename = "uses_deprecated_flags")]
    uses_dfr: bool,
}

impl Driver {
    /// Build and validate a driver from flag values.
    pub fn from_options(opts: &dyn DriverOptions) -> Result<Self> {
        let mut driver = Self::default();
        driver.set_config_from_flags(opts)?;
        Ok(driver)
    }

    /// Populate every field from `opts` and run all validators.
    pub fn set_config_from_flags(&mut self, opts: &dyn DriverOptions) -> Result<()> {
        self.access_token = opts.string(FLAG_API_TOKEN);
        self.image = non_empty(opts.string(FLAG_IMAGE));
        self.image_id = Some(opts.int(FLAG_IMAGE_ID)).filter(|id| *id != 0);
        self.set_image_arch(&opts.string(FLAG_IMAGE_ARCH))?;

        self.server_type = non_empty(opts.string(FLAG_SERVER_TYPE))
            .unwrap_or_else(|| DEFAULT_SERVER_TYPE.to_string());
        self.server_location = non_empty(opts.string(FLAG_SERVER_LOCATION));
        self.placement_group = non_empty(opts.string(FLAG_PLACEMENT_GROUP));

        self.ssh_user =
            non_empty(opts.string(FLAG_SSH_USER)).unwrap_or_else(|| DEFAULT_SSH_USER.to_string());
        self.ssh_port = match opts.int(FLAG_SSH_PORT) {
            0 => DEFAULT_SSH_PORT as u16,
            port => u16::try_from(port).map_err(|_| DriverError::InvalidValue {
                flag: FLAG_SSH_PORT,
                value: port.to_string(),
            })?,
        };

        self.set_user_data_flags(opts)?;

        self.networks = opts.string_slice(FLAG_NETWORKS);
        self.firewalls = opts.string_slice(FLAG_FIREWALLS);
        self.volumes = opts.string_slice(FLAG_VOLUMES);

        self.use_private_network = opts.bool(FLAG_USE_PRIVATE_NETWORK);
        self.disable_public4 =
            self.deprecated_boolean_flag(opts, FLAG_DISABLE_PUBLIC_4, LEGACY_FLAG_DISABLE_PUBLIC_4);
        self.disable_public6 =
            self.deprecated_boolean_flag(opts, FLAG_DISABLE_PUBLIC_6, LEGACY_FLAG_DISABLE_PUBLIC_6);
        if opts.bool(FLAG_DISABLE_PUBLIC) {
            self.disable_public4 = true;
            self.disable_public6 = true;
            self.use_private_network = true;
        }
        self.primary_ipv4 = non_empty(opts.string(FLAG_PRIMARY_4));
        self.primary_ipv6 = non_empty(opts.string(FLAG_PRIMARY_6));

        self.set_labels_from_flags(opts)?;

        if self.uses_dfr {
            warn!(
                "Your configuration uses flags that are DEPRECATED FOR REMOVAL. \
                 They will stop working in the next major release; see the warnings above."
            );
        }

        if self.access_token.is_empty() {
            return Err(DriverError::MissingFlag(FLAG_API_TOKEN));
        }

        self.verify_image_flags()?;
        self.verify_network_flags()?;

        debug!(
            image = ?self.image,
            image_id = ?self.image_id,
            server_type = %self.server_type,
            private_network = self.use_private_network,
            "Driver configuration resolved"
        );
        Ok(())
    }

    /// Set the image architecture; an empty string leaves it unset.
    pub fn set_image_arch(&mut self, arch: &str) -> Result<()> {
        self.image_arch = match arch {
            "" => None,
            other => Some(other.parse()?),
        };
        Ok(())
    }

    /// Check image selection and fall back to the default image.
    pub fn verify_image_flags(&mut self) -> Result<()> {
        let image_id_set = self.image_id.is_some();

        match self.image.as_deref() {
            Some(image) if image_id_set && !is_default_image_name(image) => {
                return Err(DriverError::MutuallyExclusive {
                    first: FLAG_IMAGE,
                    second: FLAG_IMAGE_ID,
                });
            }
            _ => {}
        }

        if image_id_set && self.image_arch.is_some() {
            return Err(DriverError::MutuallyExclusive {
                first: FLAG_IMAGE_ARCH,
                second: FLAG_IMAGE_ID,
            });
        }

        if !image_id_set && self.image.is_none() {
            self.image = Some(DEFAULT_IMAGE.to_string());
        }
        Ok(())
    }

    /// Check that the public/private networking combination is usable.
    pub fn verify_network_flags(&self) -> Result<()> {
        if self.disable_public4 && self.disable_public6 && !self.use_private_network {
            return Err(DriverError::PrivateNetworkRequired {
                flag: FLAG_USE_PRIVATE_NETWORK,
                hint: FLAG_DISABLE_PUBLIC,
            });
        }

        if self.disable_public4 && self.primary_ipv4.is_some() {
            return Err(DriverError::MutuallyExclusive {
                first: FLAG_PRIMARY_4,
                second: FLAG_DISABLE_PUBLIC_4,
            });
        }

        if self.disable_public6 && self.primary_ipv6.is_some() {
            return Err(DriverError::MutuallyExclusive {
                first: FLAG_PRIMARY_6,
                second: FLAG_DISABLE_PUBLIC_6,
            });
        }
        Ok(())
    }

    /// Read a boolean flag that has a deprecated alias.
    ///
    /// A set deprecated alias wins over the current flag and marks
    /// deprecated usage.
    pub fn deprecated_boolean_flag(
        &mut self,
        opts: &dyn DriverOptions,
        flag: &str,
        deprecated_flag: &str,
    ) -> bool {
        if opts.bool(deprecated_flag) {
            warn!(
                "--{} is DEPRECATED FOR REMOVAL, use --{} instead",
                deprecated_flag, flag
            );
            self.uses_dfr = true;
            return true;
        }
        opts.bool(flag)
    }

    /// Resolve inline, file-based, and legacy user data flags.
    pub fn set_user_data_flags(&mut self, opts: &dyn DriverOptions) -> Result<()> {
        let user_data = opts.string(FLAG_USER_DATA);
        let user_data_file = opts.string(FLAG_USER_DATA_FILE);
        let additional_user_data = opts.string(FLAG_ADDITIONAL_USER_DATA);

        if opts.bool(LEGACY_FLAG_USER_DATA_FROM_FILE) {
            if !user_data_file.is_empty() {
                return Err(DriverError::MutuallyExclusive {
                    first: FLAG_USER_DATA_FILE,
                    second: LEGACY_FLAG_USER_DATA_FROM_FILE,
                });
            }

            if additional_user_data.is_empty() {
                warn!(
                    "--{} is DEPRECATED FOR REMOVAL, pass '--{} \"{}\"'",
                    LEGACY_FLAG_USER_DATA_FROM_FILE, FLAG_USER_DATA_FILE, user_data
                );
                self.uses_dfr = true;
                self.user_data_file = non_empty(user_data).map(PathBuf::from);
            } else {
                let content = read_user_data_file(Path::new(&user_data))?;
                let merged =
                    merge_yaml_docs(&additional_user_data.replace("\\n", "\n"), &content)
                        .map_err(|e| DriverError::MergeUserData(Box::new(e)))?;
                self.user_data = Some(merged);
            }
            return Ok(());
        }

        if !additional_user_data.is_empty() {
            warn!(
                "--{} only applies together with --{}, ignoring it",
                FLAG_ADDITIONAL_USER_DATA, LEGACY_FLAG_USER_DATA_FROM_FILE
            );
        }

        self.user_data = non_empty(user_data);
        self.user_data_file = non_empty(user_data_file).map(PathBuf::from);

        if self.user_data.is_some() && self.user_data_file.is_some() {
            return Err(DriverError::MutuallyExclusive {
                first: FLAG_USER_DATA,
                second: FLAG_USER_DATA_FILE,
            });
        }
        Ok(())
    }

    /// Parse server and key labels from `key=value` entries.
    pub fn set_labels_from_flags(&mut self, opts: &dyn DriverOptions) -> Result<()> {
        self.server_labels = parse_labels(LabelKind::Server, &opts.string_slice(FLAG_SERVER_LABEL))?;
        self.key_labels = parse_labels(LabelKind::Key, &opts.string_slice(FLAG_KEY_LABEL))?;
        Ok(())
    }

    /// Effective cloud-init payload: inline data, or the user data file's content.
    pub fn user_data(&self) -> Result<String> {
        if let Some(inline) = &self.user_data {
            return Ok(inline.clone());
        }
        match &self.user_data_file {
            Some(path) => read_user_data_file(path),
            None => Ok(String::new()),
        }
    }

    /// Whether a deprecated flag was used while building this driver.
    pub fn uses_deprecated_flags(&self) -> bool {
        self.uses_dfr
    }
}

fn parse_labels(kind: LabelKind, entries: &[String]) -> Result<BTreeMap<String, String>> {
    let mut labels = BTreeMap::new();
    for entry in entries {
        let (key, value) = entry.split_once('=').ok_or_else(|| DriverError::InvalidLabel {
            kind,
            label: entry.clone(),
        })?;
        labels.insert(key.to_string(), value.to_string());
    }
    Ok(labels)
}

fn read_user_data_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| DriverError::ReadUserData {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
