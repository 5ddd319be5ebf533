use crate::library::Result;
use serde::{Deserialize, Serialize};

const SETTINGS_KEY: &str = "app_settings";

/// App settings stored in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
    #[serde(default = "default_library_page_size")]
    pub library_page_size: u32,
}

fn default_toast_duration_ms() -> u64 {
    2500
}

fn default_library_page_size() -> u32 {
    200
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_duration_ms(),
            library_page_size: default_library_page_size(),
        }
    }
}

pub(super) fn save(conn: &rusqlite::Connection, settings: &AppSettings) -> Result<()> {
    let settings_json = serde_json::to_string(settings)?;

    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        [SETTINGS_KEY, settings_json.as_str()],
    )?;

    Ok(())
}

pub(super) fn load(conn: &rusqlite::Connection) -> Result<AppSettings> {
    let result: rusqlite::Result<String> = conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        [SETTINGS_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(AppSettings::default()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_table() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        crate::db::initialize_database(&conn).unwrap();

        assert_eq!(load(&conn).unwrap(), AppSettings::default());

        let custom = AppSettings {
            toast_duration_ms: 900,
            library_page_size: 25,
        };
        save(&conn, &custom).unwrap();
        assert_eq!(load(&conn).unwrap(), custom);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"toast_duration_ms": 10}"#).unwrap();
        assert_eq!(settings.toast_duration_ms, 10);
        assert_eq!(settings.library_page_size, 200);
    }
}
