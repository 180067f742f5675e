//! Topology entity - the services the compose tool brings up
//!
//! Built by the compose generator, rendered to `docker-compose.yml`, and
//! regenerated every run.

use serde::Serialize;

/// One published port (`[host_ip:]host:container`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortBinding {
    pub host_ip: Option<String>,
    pub host: u16,
    pub container: u16,
}

impl PortBinding {
    pub fn public(host: u16, container: u16) -> Self {
        Self {
            host_ip: None,
            host,
            container,
        }
    }

    pub fn loopback(host: u16, container: u16) -> Self {
        Self {
            host_ip: Some("127.0.0.1".to_string()),
            host,
            container,
        }
    }
}

impl std::fmt::Display for PortBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ip) = &self.host_ip {
            write!(f, "{}:", ip)?;
        }
        write!(f, "{}:{}", self.host, self.container)
    }
}

/// A single container service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub name: String,
    pub image: String,
    pub restart: String,
    /// Ordered environment; values may hold `${NAME}` placeholders
    pub environment: Vec<(String, String)>,
    pub volumes: Vec<String>,
    pub ports: Vec<PortBinding>,
    pub depends_on: Vec<String>,
}

impl Service {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            restart: "unless-stopped".to_string(),
            environment: Vec::new(),
            volumes: Vec::new(),
            ports: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.environment.push((key.to_string(), value.to_string()));
        self
    }

    pub fn volume(mut self, spec: &str) -> Self {
        self.volumes.push(spec.to_string());
        self
    }

    pub fn port(mut self, binding: PortBinding) -> Self {
        self.ports.push(binding);
        self
    }

    pub fn depends_on(mut self, service: &str) -> Self {
        self.depends_on.push(service.to_string());
        self
    }
}

/// Named services plus named volumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub services: Vec<Service>,
    pub volumes: Vec<String>,
}

impl Topology {
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Add a binding to a service unless it is already published; `false` if unchanged
    pub fn publish(&mut self, service: &str, binding: PortBinding) -> bool {
        match self.services.iter_mut().find(|s| s.name == service) {
            Some(s) if !s.ports.contains(&binding) => {
                s.ports.push(binding);
                true
            }
            _ => false,
        }
    }

    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|s| s.image.as_str())
    }

    /// Every `${NAME}` placeholder referenced by any service, first-seen order
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for service in &self.services {
            for (_, value) in &service.environment {
                let mut rest = value.as_str();
                while let Some(start) = rest.find("${") {
                    let after = &rest[start + 2..];
                    let Some(end) = after.find('}') else {
                        break;
                    };
                    let name = after[..end].to_string();
                    if !names.contains(&name) {
                        names.push(name);
                    }
                    rest = &after[end + 1..];
                }
            }
        }
        names
    }

    /// Host ports published on all interfaces
    pub fn public_ports(&self) -> Vec<(u16, &str)> {
        self.services
            .iter()
            .flat_map(|s| {
                s.ports
                    .iter()
                    .filter(|p| p.host_ip.is_none())
                    .map(move |p| (p.host, s.name.as_str()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_binding_display() {
        assert_eq!(PortBinding::public(80, 80).to_string(), "80:80");
        assert_eq!(
            PortBinding::loopback(8080, 80).to_string(),
            "127.0.0.1:8080:80"
        );
    }

    #[test]
    fn placeholders_are_collected_once() {
        let topology = Topology {
            services: vec![
                Service::new("db", "mariadb:10.5")
                    .env("MYSQL_ROOT_PASSWORD", "${MYSQL_ROOT_PASSWORD}")
                    .env("MYSQL_USER", "${MYSQL_USER}"),
                Service::new("ui", "phpmyadmin/phpmyadmin:latest")
                    .env("PMA_PASSWORD", "${MYSQL_ROOT_PASSWORD}")
                    .env("PMA_HOST", "db"),
            ],
            volumes: vec![],
        };
        assert_eq!(
            topology.placeholders(),
            vec!["MYSQL_ROOT_PASSWORD".to_string(), "MYSQL_USER".to_string()]
        );
    }

    #[test]
    fn public_ports_skip_loopback_bindings() {
        let topology = Topology {
            services: vec![
                Service::new("nginx", "nginx:stable-alpine").port(PortBinding::public(80, 80)),
                Service::new("adminer", "adminer:latest").port(PortBinding::loopback(8080, 8080)),
            ],
            volumes: vec![],
        };
        assert_eq!(topology.public_ports(), vec![(80, "nginx")]);
    }

    #[test]
    fn publish_adds_binding_once() {
        let mut topology = Topology {
            services: vec![
                Service::new("nginx", "nginx:stable-alpine").port(PortBinding::public(80, 80))
            ],
            volumes: vec![],
        };
        assert!(topology.publish("nginx", PortBinding::public(443, 443)));
        assert!(!topology.publish("nginx", PortBinding::public(443, 443)));
        assert!(!topology.publish("php", PortBinding::public(9000, 9000)));
        assert_eq!(topology.public_ports(), vec![(80, "nginx"), (443, "nginx")]);
    }
}
