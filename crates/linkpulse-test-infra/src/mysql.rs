use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use typed_builder::TypedBuilder;

pub const MYSQL_PORT: u16 = 3306;

/// The entrypoint first boots a temporary server on port 0 to run its init
/// scripts and logs "ready for connections" for it too. Only the final
/// server reports the real port. The X plugin's `port: 33060` line must not
/// match either.
const READY_LINE: &str = "port: 3306  MySQL Community Server";

/// Credentials and image of a disposable MySQL server.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = "linkpulse".to_string(), setter(into))]
    database: String,
    #[builder(default = "linkpulse".to_string(), setter(into))]
    username: String,
    #[builder(default = "linkpulse".to_string(), setter(into))]
    password: String,
    #[builder(default = "8.4".to_string(), setter(into))]
    tag: String,
}

/// A MySQL container that is stopped and removed when dropped.
///
/// The server runs with `utf8mb4` and a binary default collation, so tests
/// see the same byte-exact comparisons as the schema declares.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
    config: MysqlConfig,
}

impl MySqlServer {
    pub async fn new(config: MysqlConfig) -> Result<Self> {
        let container = GenericImage::new("mysql", config.tag.as_str())
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr(READY_LINE))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.username.as_str())
            .with_env_var("MYSQL_PASSWORD", config.password.as_str())
            .with_env_var("MYSQL_ROOT_PASSWORD", config.password.as_str())
            .with_cmd([
                "--character-set-server=utf8mb4",
                "--collation-server=utf8mb4_bin",
            ])
            .start()
            .await?;

        Ok(Self { container, config })
    }

    pub async fn host(&self) -> Result<String> {
        Ok(self.container.get_host().await?.to_string())
    }

    /// Host port mapped to the container's MySQL port.
    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(MYSQL_PORT).await?)
    }

    /// `mysql://` DSN for the application user, as accepted by sqlx.
    pub async fn database_url(&self) -> Result<String> {
        let MysqlConfig {
            database,
            username,
            password,
            ..
        } = &self.config;

        Ok(format!(
            "mysql://{username}:{password}@{host}:{port}/{database}",
            host = self.host().await?,
            port = self.port().await?,
        ))
    }
}
