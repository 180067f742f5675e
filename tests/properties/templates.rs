//! Property tests for compose and proxy rendering.

use proptest::prelude::*;

use quickstack::domain::services::{
    add_https_port, infer_profile, render, render_proxy_config, tls_domain, to_compose_yaml,
    PatchOutcome, ProxyMode, PROXY_SERVICE,
};
use quickstack::domain::value_objects::{Architecture, EnvironmentDescriptor, Profile};

fn any_profile() -> impl Strategy<Value = Profile> {
    prop_oneof![Just(Profile::Static), Just(Profile::Dynamic)]
}

fn any_env() -> impl Strategy<Value = EnvironmentDescriptor> {
    (
        prop_oneof![Just("amzn"), Just("ubuntu"), Just("debian"), Just("")],
        prop_oneof![Just("x86_64"), Just("aarch64"), Just("arm64"), Just("riscv64")],
    )
        .prop_map(|(id, machine)| EnvironmentDescriptor::new(id, "", "1", machine))
}

fn any_domain() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9]{0,10}", "[a-z]{2,6}").prop_map(|(name, tld)| format!("{}.{}", name, tld))
}

proptest! {
    /// PROPERTY: rendering is a pure function of profile and architecture.
    #[test]
    fn property_render_is_deterministic(profile in any_profile(), env in any_env()) {
        let a = to_compose_yaml(&render(profile, &env));
        let b = to_compose_yaml(&render(profile, &env));
        prop_assert_eq!(&a, &b);
        prop_assert!(serde_yaml_ng::from_str::<serde_yaml_ng::Value>(&a).is_ok());
        prop_assert_eq!(infer_profile(&a), profile);
    }

    /// PROPERTY: only port 80 is public; the DB UI stays on loopback.
    #[test]
    fn property_only_proxy_is_public(profile in any_profile(), env in any_env()) {
        let topology = render(profile, &env);
        prop_assert_eq!(topology.public_ports(), vec![(80, PROXY_SERVICE)]);

        let ui = if env.architecture == Architecture::Arm64 { "adminer" } else { "phpmyadmin" };
        match profile {
            Profile::Static => prop_assert_eq!(topology.services.len(), 1),
            Profile::Dynamic => {
                let service = topology.service(ui).unwrap();
                prop_assert_eq!(service.ports[0].host_ip.as_deref(), Some("127.0.0.1"));
            }
        }
    }

    /// PROPERTY: credentials appear only as placeholders.
    #[test]
    fn property_placeholders_name_credentials(env in any_env()) {
        let topology = render(Profile::Dynamic, &env);
        for name in topology.placeholders() {
            prop_assert!(name.starts_with("MYSQL_"), "{}", name);
        }
        let yaml = to_compose_yaml(&topology);
        prop_assert!(
            yaml.contains("\"${MYSQL_ROOT_PASSWORD}\""),
            "root password placeholder missing"
        );
    }

    /// PROPERTY: the 443 patch applies once and only once.
    #[test]
    fn property_https_patch_is_idempotent(profile in any_profile(), env in any_env()) {
        let yaml = to_compose_yaml(&render(profile, &env));
        let PatchOutcome::Patched(patched) = add_https_port(&yaml, PROXY_SERVICE) else {
            panic!("fresh manifest should be patchable");
        };
        prop_assert_eq!(patched.matches("\"443:443\"").count(), 1);
        prop_assert_eq!(add_https_port(&patched, PROXY_SERVICE), PatchOutcome::AlreadyPresent);
        prop_assert!(serde_yaml_ng::from_str::<serde_yaml_ng::Value>(&patched).is_ok());
    }

    /// PROPERTY: a TLS proxy config names its domain; an HTTP one names none.
    #[test]
    fn property_tls_domain_recoverable(profile in any_profile(), domain in any_domain()) {
        let tls = render_proxy_config(profile, &ProxyMode::Tls { domain: domain.clone() });
        prop_assert_eq!(tls_domain(&tls), Some(domain));
        prop_assert_eq!(tls_domain(&render_proxy_config(profile, &ProxyMode::Http)), None);
    }
}
