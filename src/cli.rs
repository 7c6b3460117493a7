//! CLI argument parsing and command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::flags::*;
use crate::domain::{FlagMap, FlagValue};

/// Hetzner Cloud provisioning driver
#[derive(Parser)]
#[command(
    name = "machine-driver-hetzner",
    version,
    about = "Hetzner Cloud provisioning driver",
    long_about = "Validates Hetzner Cloud driver flags and merges cloud-init user data \
                  the way the driver does before a server is created."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate driver flags and print the resolved configuration as JSON
    Check {
        #[command(flatten)]
        flags: DriverArgs,
    },
    /// Print the cloud-init user data the driver would send
    UserData {
        #[command(flatten)]
        flags: DriverArgs,
    },
    /// Merge two cloud-init YAML files (the second wins on conflicts)
    MergeUserData {
        /// Base document
        first: PathBuf,
        /// Document merged on top of the base
        second: PathBuf,
    },
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Display version information
    Version,
}

/// Driver flags, as the host tool passes them.
#[derive(Debug, Default, Args)]
pub struct DriverArgs {
    /// Project-specific Hetzner API token
    #[arg(long = "hetzner-api-token", env = "HETZNER_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Image to use for server creation
    #[arg(long = "hetzner-image", env = "HETZNER_IMAGE")]
    pub image: Option<String>,

    /// Image ID to use for server creation
    #[arg(long = "hetzner-image-id", env = "HETZNER_IMAGE_ID")]
    pub image_id: Option<i64>,

    /// Image architecture (arm or x86)
    #[arg(long = "hetzner-image-arch", env = "HETZNER_IMAGE_ARCH")]
    pub image_arch: Option<String>,

    /// Server type to create
    #[arg(long = "hetzner-server-type", env = "HETZNER_TYPE")]
    pub server_type: Option<String>,

    /// Location to create the server in
    #[arg(long = "hetzner-server-location", env = "HETZNER_LOCATION")]
    pub server_location: Option<String>,

    /// SSH username
    #[arg(long = "hetzner-ssh-user", env = "HETZNER_SSH_USER")]
    pub ssh_user: Option<String>,

    /// SSH port
    #[arg(long = "hetzner-ssh-port", env = "HETZNER_SSH_PORT")]
    pub ssh_port: Option<i64>,

    /// Network IDs or names to attach the server to
    #[arg(long = "hetzner-networks", env = "HETZNER_NETWORKS", value_delimiter = ',')]
    pub networks: Vec<String>,

    /// Firewall IDs or names to apply to the server
    #[arg(long = "hetzner-firewalls", env = "HETZNER_FIREWALLS", value_delimiter = ',')]
    pub firewalls: Vec<String>,

    /// Volume IDs or names to attach to the server
    #[arg(long = "hetzner-volumes", env = "HETZNER_VOLUMES", value_delimiter = ',')]
    pub volumes: Vec<String>,

    /// Placement group ID or name to add the server to
    #[arg(long = "hetzner-placement-group", env = "HETZNER_PLACEMENT_GROUP")]
    pub placement_group: Option<String>,

    /// Use private network
    #[arg(long = "hetzner-use-private-network", env = "HETZNER_USE_PRIVATE_NETWORK")]
    pub use_private_network: bool,

    /// Disable public IPv4 and IPv6, implies private networking
    #[arg(long = "hetzner-disable-public", env = "HETZNER_DISABLE_PUBLIC")]
    pub disable_public: bool,

    /// Disable public IPv4
    #[arg(long = "hetzner-disable-public-ipv4", env = "HETZNER_DISABLE_PUBLIC_IPV4")]
    pub disable_public4: bool,

    /// Disable public IPv6
    #[arg(long = "hetzner-disable-public-ipv6", env = "HETZNER_DISABLE_PUBLIC_IPV6")]
    pub disable_public6: bool,

    /// Existing primary IPv4 address
    #[arg(long = "hetzner-primary-ipv4", env = "HETZNER_PRIMARY_IPV4")]
    pub primary_ipv4: Option<String>,

    /// Existing primary IPv6 address
    #[arg(long = "hetzner-primary-ipv6", env = "HETZNER_PRIMARY_IPV6")]
    pub primary_ipv6: Option<String>,

    /// Cloud-init user data
    #[arg(long = "hetzner-user-data", env = "HETZNER_USER_DATA")]
    pub user_data: Option<String>,

    /// Cloud-init user data file
    #[arg(long = "hetzner-user-data-file", env = "HETZNER_USER_DATA_FILE")]
    pub user_data_file: Option<String>,

    /// Additional cloud-init YAML merged into the user data file
    #[arg(long = "hetzner-additional-user-data", env = "HETZNER_ADDITIONAL_USER_DATA")]
    pub additional_user_data: Option<String>,

    /// Key value pairs of additional labels to assign to the server
    #[arg(long = "hetzner-server-label")]
    pub server_labels: Vec<String>,

    /// Key value pairs of additional labels to assign to the SSH key
    #[arg(long = "hetzner-key-label")]
    pub key_labels: Vec<String>,

    /// DEPRECATED, use --hetzner-disable-public-ipv4
    #[arg(long = "hetzner-disable-public-4", hide = true)]
    pub legacy_disable_public4: bool,

    /// DEPRECATED, use --hetzner-disable-public-ipv6
    #[arg(long = "hetzner-disable-public-6", hide = true)]
    pub legacy_disable_public6: bool,

    /// DEPRECATED, use --hetzner-user-data-file
    #[arg(long = "hetzner-user-data-from-file", env = "HETZNER_USER_DATA_FROM_FILE")]
    pub legacy_user_data_from_file: bool,
}

impl DriverArgs {
    /// Collect the flags that were actually given.
    ///
    /// Unset options, `false` switches, and empty lists are left out so that
    /// configuration file defaults can fill them in.
    pub fn to_flag_map(&self) -> FlagMap {
        let mut map = FlagMap::new();

        let strings = [
            (FLAG_API_TOKEN, &self.api_token),
            (FLAG_IMAGE, &self.image),
            (FLAG_IMAGE_ARCH, &self.image_arch),
            (FLAG_SERVER_TYPE, &self.server_type),
            (FLAG_SERVER_LOCATION, &self.server_location),
            (FLAG_SSH_USER, &self.ssh_user),
            (FLAG_PLACEMENT_GROUP, &self.placement_group),
            (FLAG_PRIMARY_4, &self.primary_ipv4),
            (FLAG_PRIMARY_6, &self.primary_ipv6),
            (FLAG_USER_DATA, &self.user_data),
            (FLAG_USER_DATA_FILE, &self.user_data_file),
            (FLAG_ADDITIONAL_USER_DATA, &self.additional_user_data),
        ];
        for (flag, value) in strings {
            if let Some(value) = value {
                map.set(flag, FlagValue::String(value.clone()));
            }
        }

        let ints = [(FLAG_IMAGE_ID, self.image_id), (FLAG_SSH_PORT, self.ssh_port)];
        for (flag, value) in ints {
            if let Some(value) = value {
                map.set(flag, FlagValue::Int(value));
            }
        }

        let switches = [
            (FLAG_USE_PRIVATE_NETWORK, self.use_private_network),
            (FLAG_DISABLE_PUBLIC, self.disable_public),
            (FLAG_DISABLE_PUBLIC_4, self.disable_public4),
            (FLAG_DISABLE_PUBLIC_6, self.disable_public6),
            (LEGACY_FLAG_DISABLE_PUBLIC_4, self.legacy_disable_public4),
            (LEGACY_FLAG_DISABLE_PUBLIC_6, self.legacy_disable_public6),
            (LEGACY_FLAG_USER_DATA_FROM_FILE, self.legacy_user_data_from_file),
        ];
        for (flag, value) in switches {
            if value {
                map.set(flag, FlagValue::Bool(true));
            }
        }

        let lists = [
            (FLAG_NETWORKS, &self.networks),
            (FLAG_FIREWALLS, &self.firewalls),
            (FLAG_VOLUMES, &self.volumes),
            (FLAG_SERVER_LABEL, &self.server_labels),
            (FLAG_KEY_LABEL, &self.key_labels),
        ];
        for (flag, values) in lists {
            if !values.is_empty() {
                map.set(flag, FlagValue::StringSlice(values.clone()));
            }
        }

        map
    }
}
