//! Driver flag names and their defaults.

/// API token used to talk to the cloud API
pub const FLAG_API_TOKEN: &str = "hetzner-api-token";
pub const FLAG_IMAGE: &str = "hetzner-image";
pub const FLAG_IMAGE_ID: &str = "hetzner-image-id";
pub const FLAG_IMAGE_ARCH: &str = "hetzner-image-arch";
pub const FLAG_SERVER_TYPE: &str = "hetzner-server-type";
pub const FLAG_SERVER_LOCATION: &str = "hetzner-server-location";
pub const FLAG_SSH_USER: &str = "hetzner-ssh-user";
pub const FLAG_SSH_PORT: &str = "hetzner-ssh-port";
pub const FLAG_NETWORKS: &str = "hetzner-networks";
pub const FLAG_FIREWALLS: &str = "hetzner-firewalls";
pub const FLAG_VOLUMES: &str = "hetzner-volumes";
pub const FLAG_PLACEMENT_GROUP: &str = "hetzner-placement-group";
pub const FLAG_USE_PRIVATE_NETWORK: &str = "hetzner-use-private-network";
pub const FLAG_DISABLE_PUBLIC: &str = "hetzner-disable-public";
pub const FLAG_DISABLE_PUBLIC_4: &str = "hetzner-disable-public-ipv4";
pub const FLAG_DISABLE_PUBLIC_6: &str = "hetzner-disable-public-ipv6";
pub const FLAG_PRIMARY_4: &str = "hetzner-primary-ipv4";
pub const FLAG_PRIMARY_6: &str = "hetzner-primary-ipv6";
pub const FLAG_USER_DATA: &str = "hetzner-user-data";
pub const FLAG_USER_DATA_FILE: &str = "hetzner-user-data-file";
pub const FLAG_ADDITIONAL_USER_DATA: &str = "hetzner-additional-user-data";
pub const FLAG_SERVER_LABEL: &str = "hetzner-server-label";
pub const FLAG_KEY_LABEL: &str = "hetzner-key-label";

pub const LEGACY_FLAG_DISABLE_PUBLIC_4: &str = "hetzner-disable-public-4";
pub const LEGACY_FLAG_DISABLE_PUBLIC_6: &str = "hetzner-disable-public-6";
pub const LEGACY_FLAG_USER_DATA_FROM_FILE: &str = "hetzner-user-data-from-file";

pub const DEFAULT_IMAGE: &str = "ubuntu-24.04";
pub const DEFAULT_SERVER_TYPE: &str = "cx22";
pub const DEFAULT_SSH_USER: &str = "root";
pub const DEFAULT_SSH_PORT: i64 = 22;

/// Image names that may accompany `--hetzner-image-id` for backwards compatibility.
const LEGACY_DEFAULT_IMAGES: &[&str] = &[DEFAULT_IMAGE, "ubuntu-18.04", "ubuntu-16.04", "debian-9"];

/// Value shape a flag accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    String,
    Bool,
    Int,
    StringSlice,
}

/// Every flag the driver understands, with its kind.
pub const KNOWN_FLAGS: &[(&str, FlagKind)] = &[
    (FLAG_API_TOKEN, FlagKind::String),
    (FLAG_IMAGE, FlagKind::String),
    (FLAG_IMAGE_ID, FlagKind::Int),
    (FLAG_IMAGE_ARCH, FlagKind::String),
    (FLAG_SERVER_TYPE, FlagKind::String),
    (FLAG_SERVER_LOCATION, FlagKind::String),
    (FLAG_SSH_USER, FlagKind::String),
    (FLAG_SSH_PORT, FlagKind::Int),
    (FLAG_NETWORKS, FlagKind::StringSlice),
    (FLAG_FIREWALLS, FlagKind::StringSlice),
    (FLAG_VOLUMES, FlagKind::StringSlice),
    (FLAG_PLACEMENT_GROUP, FlagKind::String),
    (FLAG_USE_PRIVATE_NETWORK, FlagKind::Bool),
    (FLAG_DISABLE_PUBLIC, FlagKind::Bool),
    (FLAG_DISABLE_PUBLIC_4, FlagKind::Bool),
    (FLAG_DISABLE_PUBLIC_6, FlagKind::Bool),
    (FLAG_PRIMARY_4, FlagKind::String),
    (FLAG_PRIMARY_6, FlagKind::String),
    (FLAG_USER_DATA, FlagKind::String),
    (FLAG_USER_DATA_FILE, FlagKind::String),
    (FLAG_ADDITIONAL_USER_DATA, FlagKind::String),
    (FLAG_SERVER_LABEL, FlagKind::StringSlice),
    (FLAG_KEY_LABEL, FlagKind::StringSlice),
    (LEGACY_FLAG_DISABLE_PUBLIC_4, FlagKind::Bool),
    (LEGACY_FLAG_DISABLE_PUBLIC_6, FlagKind::Bool),
    (LEGACY_FLAG_USER_DATA_FROM_FILE, FlagKind::Bool),
];

/// Look up the kind of a flag by name.
pub fn flag_kind(name: &str) -> Option<FlagKind> {
    KNOWN_FLAGS
        .iter()
        .find(|(flag, _)| *flag == name)
        .map(|(_, kind)| *kind)
}

/// Check whether an image name is one of the historical defaults.
pub fn is_default_image_name(image: &str) -> bool {
    LEGACY_DEFAULT_IMAGES.contains(&image)
}
