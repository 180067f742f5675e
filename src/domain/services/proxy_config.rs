//! Proxy configuration renderer
//!
//! Renders `nginx/conf.d/default.conf` in plain HTTP or TLS mode. Both modes
//! answer the ACME challenge path from the shared webroot, so issuance works
//! against a running HTTP stack and renewals keep working after TLS is on.

use crate::domain::value_objects::Profile;

/// Document root inside the proxy and PHP containers
pub const SITE_ROOT: &str = "/var/www/html";
/// Challenge webroot inside the proxy container
pub const ACME_WEBROOT: &str = "/var/www/certbot";
/// Certificate root as seen from inside the proxy container
pub const CONTAINER_CERT_ROOT: &str = "/etc/letsencrypt/live";

/// Which form of the proxy config to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyMode {
    /// Single port-80 listener for any host name
    Http,
    /// Port-80 redirect plus a port-443 TLS listener
    Tls { domain: String },
}

/// Host names a certificate covers: the apex and its `www.` alias
pub fn server_names(domain: &str) -> Vec<String> {
    vec![domain.to_string(), format!("www.{}", domain)]
}

pub fn render_proxy_config(profile: Profile, mode: &ProxyMode) -> String {
    match mode {
        ProxyMode::Http => {
            let mut out = String::from("server {\n    listen 80;\n    server_name _;\n");
            out.push_str(&site_body(profile));
            out.push_str("}\n");
            out
        }
        ProxyMode::Tls { domain } => {
            let names = server_names(domain).join(" ");
            let mut out = String::new();
            out.push_str("server {\n    listen 80;\n");
            out.push_str(&format!("    server_name {};\n\n", names));
            out.push_str(&acme_location());
            out.push_str("\n    location / {\n        return 301 https://$host$request_uri;\n    }\n}\n\n");

            out.push_str("server {\n    listen 443 ssl http2;\n");
            out.push_str(&format!("    server_name {};\n\n", names));
            out.push_str(&format!(
                "    ssl_certificate {root}/{domain}/fullchain.pem;\n    ssl_certificate_key {root}/{domain}/privkey.pem;\n",
                root = CONTAINER_CERT_ROOT,
                domain = domain
            ));
            out.push_str("    ssl_protocols TLSv1.2 TLSv1.3;\n    ssl_ciphers HIGH:!aNULL:!MD5;\n");
            out.push_str(&site_body(profile));
            out.push_str("}\n");
            out
        }
    }
}

fn acme_location() -> String {
    format!(
        "    location /.well-known/acme-challenge/ {{\n        root {};\n    }}\n",
        ACME_WEBROOT
    )
}

fn site_body(profile: Profile) -> String {
    let mut out = String::new();
    out.push_str(&format!("    root {};\n", SITE_ROOT));
    match profile {
        Profile::Static => out.push_str("    index index.html;\n\n"),
        Profile::Dynamic => out.push_str("    index index.php index.html;\n\n"),
    }
    out.push_str(&acme_location());
    out.push('\n');
    match profile {
        Profile::Static => {
            out.push_str("    location / {\n        try_files $uri $uri/ =404;\n    }\n");
        }
        Profile::Dynamic => {
            out.push_str(
                "    location / {\n        try_files $uri $uri/ /index.php?$query_string;\n    }\n\n",
            );
            out.push_str("    location ~ \\.php$ {\n");
            out.push_str("        fastcgi_pass php:9000;\n");
            out.push_str("        include fastcgi_params;\n");
            out.push_str(
                "        fastcgi_param SCRIPT_FILENAME $document_root$fastcgi_script_name;\n",
            );
            out.push_str("    }\n");
        }
    }
    out
}

/// Domain of an already-rendered TLS config, read from its certificate path
pub fn tls_domain(config: &str) -> Option<String> {
    let prefix = format!("ssl_certificate {}/", CONTAINER_CERT_ROOT);
    config.lines().find_map(|line| {
        line.trim()
            .strip_prefix(&prefix)?
            .strip_suffix("/fullchain.pem;")
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    })
}

/// Count `listen <port>` directives, for invariants and diagnostics
pub fn count_listeners(config: &str, port: u16) -> usize {
    let needle = format!("listen {}", port);
    config
        .lines()
        .map(str::trim)
        .filter(|l| {
            l.strip_prefix(&needle)
                .is_some_and(|rest| rest.starts_with(';') || rest.starts_with(' '))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tls(domain: &str) -> ProxyMode {
        ProxyMode::Tls {
            domain: domain.to_string(),
        }
    }

    #[test]
    fn tls_domain_round_trips_through_render() {
        let config = render_proxy_config(Profile::Static, &tls("example.org"));
        assert_eq!(tls_domain(&config).as_deref(), Some("example.org"));
        assert_eq!(
            tls_domain(&render_proxy_config(Profile::Static, &ProxyMode::Http)),
            None
        );
    }

    #[test]
    fn http_mode_has_single_port_80_listener() {
        for profile in Profile::ALL {
            let conf = render_proxy_config(profile, &ProxyMode::Http);
            assert_eq!(count_listeners(&conf, 80), 1);
            assert_eq!(count_listeners(&conf, 443), 0);
            assert!(conf.contains("server_name _;"));
        }
    }

    #[test]
    fn tls_mode_has_one_listener_each() {
        let conf = render_proxy_config(Profile::Dynamic, &tls("example.com"));
        assert_eq!(count_listeners(&conf, 80), 1);
        assert_eq!(count_listeners(&conf, 443), 1);
        assert!(conf.contains("return 301 https://$host$request_uri;"));
        assert!(conf.contains("ssl_certificate /etc/letsencrypt/live/example.com/fullchain.pem;"));
        assert!(conf.contains("ssl_certificate_key /etc/letsencrypt/live/example.com/privkey.pem;"));
        assert!(conf.contains("server_name example.com www.example.com;"));
    }

    #[test]
    fn both_modes_serve_acme_challenge() {
        for mode in [ProxyMode::Http, tls("example.com")] {
            for profile in Profile::ALL {
                let conf = render_proxy_config(profile, &mode);
                assert!(conf.contains("location /.well-known/acme-challenge/ {"));
                assert!(conf.contains("root /var/www/certbot;"));
            }
        }
    }

    #[test]
    fn only_dynamic_profile_talks_to_php() {
        let dynamic = render_proxy_config(Profile::Dynamic, &ProxyMode::Http);
        let static_ = render_proxy_config(Profile::Static, &ProxyMode::Http);
        assert!(dynamic.contains("fastcgi_pass php:9000;"));
        assert!(!static_.contains("fastcgi_pass"));
    }

    #[test]
    fn listener_count_ignores_other_ports() {
        assert_eq!(count_listeners("listen 8080;\nlisten 80;\n", 80), 1);
        assert_eq!(count_listeners("listen 443 ssl http2;\n", 443), 1);
    }
}
