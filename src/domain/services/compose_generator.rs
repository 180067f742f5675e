//! Compose generator
//!
//! `render` builds the `Topology` for a profile and architecture;
//! `to_compose_yaml` turns it into `docker-compose.yml` text. Both are pure.
//! Credentials only ever appear as `${NAME}` placeholders, resolved by the
//! compose tool from the credential store at start time.

use crate::domain::entities::{PortBinding, Service, Topology};
use crate::domain::value_objects::{Architecture, EnvironmentDescriptor, Profile};

use super::proxy_config::{ACME_WEBROOT, SITE_ROOT};

/// Host paths the topology mounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSettings {
    /// Certificate client's data directory (certificates live under `live/`)
    pub letsencrypt_dir: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            letsencrypt_dir: "/etc/letsencrypt".to_string(),
        }
    }
}

pub const PROXY_SERVICE: &str = "nginx";
pub const DB_VOLUME: &str = "db_data";

/// Render the topology with default host paths
pub fn render(profile: Profile, env: &EnvironmentDescriptor) -> Topology {
    render_with(profile, env, &TemplateSettings::default())
}

pub fn render_with(
    profile: Profile,
    env: &EnvironmentDescriptor,
    settings: &TemplateSettings,
) -> Topology {
    let site_mount = format!("./www:{}:ro", SITE_ROOT);
    let certs_mount = format!("{}:/etc/letsencrypt:ro", settings.letsencrypt_dir);
    let webroot_mount = format!("./certbot/www:{}:ro", ACME_WEBROOT);

    let mut proxy = Service::new(PROXY_SERVICE, "nginx:stable-alpine")
        .volume(&site_mount)
        .volume("./nginx/conf.d:/etc/nginx/conf.d:ro")
        .volume(&webroot_mount)
        .volume(&certs_mount)
        .port(PortBinding::public(80, 80));

    match profile {
        Profile::Static => Topology {
            services: vec![proxy],
            volumes: Vec::new(),
        },
        Profile::Dynamic => {
            proxy = proxy.depends_on("php");

            let php = Service::new("php", "php:8.1-fpm-alpine")
                .volume(&format!("./www:{}", SITE_ROOT))
                .depends_on("db");

            let db = Service::new("db", "mariadb:10.5")
                .env("MYSQL_ROOT_PASSWORD", "${MYSQL_ROOT_PASSWORD}")
                .env("MYSQL_DATABASE", "${MYSQL_DATABASE}")
                .env("MYSQL_USER", "${MYSQL_USER}")
                .env("MYSQL_PASSWORD", "${MYSQL_PASSWORD}")
                .volume(&format!("{}:/var/lib/mysql", DB_VOLUME));

            Topology {
                services: vec![proxy, php, db, db_admin_ui(env.architecture)],
                volumes: vec![DB_VOLUME.to_string()],
            }
        }
    }
}

/// The only architecture-conditioned service
fn db_admin_ui(arch: Architecture) -> Service {
    match arch {
        Architecture::Arm64 => Service::new("adminer", "adminer:latest")
            .env("ADMINER_DEFAULT_SERVER", "db")
            .port(PortBinding::loopback(8080, 8080))
            .depends_on("db"),
        Architecture::X86_64 => Service::new("phpmyadmin", "phpmyadmin/phpmyadmin:latest")
            .env("PMA_HOST", "db")
            .env("PMA_USER", "root")
            .env("PMA_PASSWORD", "${MYSQL_ROOT_PASSWORD}")
            .port(PortBinding::loopback(8080, 80))
            .depends_on("db"),
    }
}

/// Profile a generated manifest was rendered for
pub fn infer_profile(manifest: &str) -> Profile {
    if manifest.lines().any(|l| l.trim_end() == "  php:") {
        Profile::Dynamic
    } else {
        Profile::Static
    }
}

/// Deterministic compose YAML.
///
/// Layout is fixed: two-space indents, ports always quoted. The TLS patcher
/// relies on the `  nginx:` / `    ports:` / `      - "80:80"` lines.
pub fn to_compose_yaml(topology: &Topology) -> String {
    let mut out = String::from("services:\n");
    for service in &topology.services {
        out.push_str(&format!("  {}:\n", service.name));
        out.push_str(&format!("    image: {}\n", service.image));
        out.push_str(&format!("    restart: {}\n", service.restart));
        if !service.environment.is_empty() {
            out.push_str("    environment:\n");
            for (key, value) in &service.environment {
                out.push_str(&format!("      {}: \"{}\"\n", key, value));
            }
        }
        if !service.volumes.is_empty() {
            out.push_str("    volumes:\n");
            for volume in &service.volumes {
                out.push_str(&format!("      - {}\n", volume));
            }
        }
        if !service.ports.is_empty() {
            out.push_str("    ports:\n");
            for port in &service.ports {
                out.push_str(&format!("      - \"{}\"\n", port));
            }
        }
        if !service.depends_on.is_empty() {
            out.push_str("    depends_on:\n");
            for dep in &service.depends_on {
                out.push_str(&format!("      - {}\n", dep));
            }
        }
    }
    if !topology.volumes.is_empty() {
        out.push_str("volumes:\n");
        for volume in &topology.volumes {
            out.push_str(&format!("  {}: {{}}\n", volume));
        }
    }
    out
}
