//! Persistent settings
//!
//! Stores the config of both integrations as JSON in the user's config directory.

use std::fs;
use std::io;
use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };
use thiserror::Error;
use vitrine_core::{ MaterialConfig, TransportConfig };


/// Errors that can occur while reading or writing settings.
#[derive( Debug, Error )]
pub enum SettingsError {
    #[error( "Settings IO error: {0}" )]
    Io( #[from] io::Error ),

    #[error( "Invalid settings file: {0}" )]
    Parse( #[from] serde_json::Error ),
}


/// Application settings.
#[derive( Debug, Clone, Default, PartialEq, Serialize, Deserialize )]
#[serde( default, rename_all = "kebab-case" )]
pub struct Settings {
    /// Window material (transparent player)
    pub transparent_player: MaterialConfig,

    /// Taskbar transport buttons (Windows)
    #[serde( rename = "taskbar-mediacontrol" )]
    pub taskbar_media_control: TransportConfig,
}


impl Settings {
    /// Returns the default path of the settings file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map( |p| p.join( "vitrine" ).join( "settings.json" ) )
    }


    /// Loads settings from `path`, or returns defaults if it does not exist.
    pub fn load_from( path: &Path ) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok( Self::default() );
        }
        let contents = fs::read_to_string( path )?;
        Ok( serde_json::from_str( &contents )? )
    }


    /// Saves settings to `path`, creating parent directories as needed.
    pub fn save_to( &self, path: &Path ) -> Result<(), SettingsError> {
        if let Some( parent ) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all( parent )?;
            }
        }
        fs::write( path, serde_json::to_string_pretty( self )? )?;
        Ok(())
    }


    /// Loads settings, falling back to defaults on any error.
    pub fn load( path: Option<&Path> ) -> Self {
        let path = match path.map( Path::to_path_buf ).or_else( Self::default_path ) {
            Some( p ) => p,
            None => return Self::default(),
        };

        match Self::load_from( &path ) {
            Ok( settings ) => settings,
            Err( e ) => {
                tracing::warn!( "Failed to read settings from {:?}: {}", path, e );
                Self::default()
            }
        }
    }


    /// Saves settings, logging any failure.
    pub fn save( &self, path: Option<&Path> ) {
        let path = match path.map( Path::to_path_buf ).or_else( Self::default_path ) {
            Some( p ) => p,
            None => return,
        };

        match self.save_to( &path ) {
            Ok(()) => tracing::info!( "Saved settings to {:?}", path ),
            Err( e ) => tracing::warn!( "Failed to save settings: {}", e ),
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use vitrine_core::MaterialType;


    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from( &dir.path().join( "absent.json" ) ).unwrap();
        assert_eq!( settings, Settings::default() );
        assert!( !settings.taskbar_media_control.enabled );
    }


    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "nested" ).join( "settings.json" );

        let mut settings = Settings::default();
        settings.transparent_player.material = MaterialType::Tabbed;
        settings.transparent_player.opacity = 0.3;
        settings.taskbar_media_control.enabled = true;
        settings.save_to( &path ).unwrap();

        assert_eq!( Settings::load_from( &path ).unwrap(), settings );
    }


    #[test]
    fn test_file_uses_plugin_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "settings.json" );
        fs::write( &path, r#"{ "taskbar-mediacontrol": { "enabled": true },
                               "transparent-player": { "type": "under-page" } }"# ).unwrap();

        let settings = Settings::load_from( &path ).unwrap();
        assert!( settings.taskbar_media_control.enabled );
        assert_eq!( settings.transparent_player.material, MaterialType::UnderPage );
        assert_eq!( settings.transparent_player.opacity, 0.5 );
    }


    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "settings.json" );
        fs::write( &path, "{ not json" ).unwrap();

        assert!( matches!( Settings::load_from( &path ), Err( SettingsError::Parse( _ ) ) ) );
        assert_eq!( Settings::load( Some( &path ) ), Settings::default() );
    }
}
