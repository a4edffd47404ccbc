use std::fmt;

/// Desktop environments whose settings daemon broadcasts media keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesktopEnvironment {
    Gnome,
    Mate,
}

impl fmt::Display for DesktopEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gnome => f.write_str("gnome"),
            Self::Mate => f.write_str("mate"),
        }
    }
}

/// Where a desktop environment exposes its media key interface on the
/// session bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopProfile {
    pub environment: DesktopEnvironment,
    pub service: &'static str,
    pub path: &'static str,
    pub interface: &'static str,
}

/// Every profile tried on activation, in order.
pub const DESKTOP_PROFILES: &[DesktopProfile] = &[
    DesktopProfile {
        environment: DesktopEnvironment::Gnome,
        service: "org.gnome.SettingsDaemon.MediaKeys",
        path: "/org/gnome/SettingsDaemon/MediaKeys",
        interface: "org.gnome.SettingsDaemon.MediaKeys",
    },
    DesktopProfile {
        environment: DesktopEnvironment::Mate,
        service: "org.mate.SettingsDaemon",
        path: "/org/mate/SettingsDaemon/MediaKeys",
        interface: "org.mate.SettingsDaemon.MediaKeys",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_profiles_cover_each_environment_once() {
        let environments: HashSet<_> = DESKTOP_PROFILES.iter().map(|p| p.environment).collect();
        assert_eq!(environments.len(), DESKTOP_PROFILES.len());
        assert!(environments.contains(&DesktopEnvironment::Gnome));
        assert!(environments.contains(&DesktopEnvironment::Mate));
    }

    #[test]
    fn test_profile_names_are_valid_bus_names() {
        for profile in DESKTOP_PROFILES {
            assert!(zbus::names::BusName::try_from(profile.service).is_ok(), "{}", profile.service);
            assert!(
                zbus::names::InterfaceName::try_from(profile.interface).is_ok(),
                "{}",
                profile.interface
            );
            assert!(
                zbus::zvariant::ObjectPath::try_from(profile.path).is_ok(),
                "{}",
                profile.path
            );
        }
    }

    #[test]
    fn test_interface_is_namespaced_by_environment() {
        for profile in DESKTOP_PROFILES {
            let prefix = format!("org.{}.", profile.environment);
            assert!(profile.interface.starts_with(&prefix), "{}", profile.interface);
            assert!(profile.interface.ends_with(".MediaKeys"));
        }
    }
}
