//! Component configuration and the config store contract
//!
//! The host owns persistence. Components read a snapshot at start and
//! receive the merged config on every change.

use std::future::Future;

use serde::{ Deserialize, Serialize };
use tokio::sync::watch;

use crate::material::MaterialType;
use crate::platform::{ default_material, PlatformKind };


const DEFAULT_OPACITY: f32 = 0.5;


/// Config shared by every plugin.
pub trait PluginConfig: Clone {
    fn enabled( &self ) -> bool;
}


/// Window material settings.
#[derive( Debug, Clone, PartialEq, Serialize, Deserialize )]
#[serde( default )]
pub struct MaterialConfig {
    pub enabled: bool,

    /// Background tint opacity (0.0 to 1.0)
    pub opacity: f32,

    #[serde( rename = "type" )]
    pub material: MaterialType,
}


impl Default for MaterialConfig {
    fn default() -> Self {
        Self::for_platform( PlatformKind::current() )
    }
}


impl MaterialConfig {
    /// Returns the defaults for a platform.
    pub fn for_platform( kind: PlatformKind ) -> Self {
        Self {
            enabled: false,
            opacity: DEFAULT_OPACITY,
            material: default_material( kind ),
        }
    }
}


impl PluginConfig for MaterialConfig {
    fn enabled( &self ) -> bool {
        self.enabled
    }
}


/// Taskbar transport control settings.
#[derive( Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default )]
pub struct TransportConfig {
    pub enabled: bool,
}


impl PluginConfig for TransportConfig {
    fn enabled( &self ) -> bool {
        self.enabled
    }
}


/// Partial update to a `MaterialConfig`.
#[derive( Debug, Clone, Copy, PartialEq )]
pub enum MaterialPatch {
    Opacity( f32 ),
    Material( MaterialType ),
}


impl MaterialPatch {
    pub fn apply( self, config: &mut MaterialConfig ) {
        match self {
            MaterialPatch::Opacity( opacity ) => config.opacity = opacity,
            MaterialPatch::Material( material ) => config.material = material,
        }
    }
}


/// Host config store.
pub trait ConfigStore<C> {
    /// Fetches the current config.
    fn get_config( &self ) -> impl Future<Output = C>;

    /// Merges a partial update and notifies subscribers.
    fn set_config( &self, patch: impl FnOnce( &mut C ) );

    /// Receives the merged config after every update.
    fn subscribe( &self ) -> watch::Receiver<C>;
}


/// In-process config store backed by a watch channel.
#[derive( Debug )]
pub struct MemoryConfigStore<C> {
    sender: watch::Sender<C>,
}


impl<C: Clone> MemoryConfigStore<C> {
    pub fn new( initial: C ) -> Self {
        let ( sender, _ ) = watch::channel( initial );
        Self { sender }
    }


    /// Returns a copy of the current config without awaiting.
    pub fn snapshot( &self ) -> C {
        self.sender.borrow().clone()
    }
}


impl<C: Clone> ConfigStore<C> for MemoryConfigStore<C> {
    async fn get_config( &self ) -> C {
        self.snapshot()
    }


    fn set_config( &self, patch: impl FnOnce( &mut C ) ) {
        // send_modify notifies even with no live receivers
        self.sender.send_modify( patch );
    }


    fn subscribe( &self ) -> watch::Receiver<C> {
        self.sender.subscribe()
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_platform_defaults() {
        let win = MaterialConfig::for_platform( PlatformKind::Windows );
        assert!( !win.enabled );
        assert_eq!( win.opacity, 0.5 );
        assert_eq!( win.material, MaterialType::Acrylic );
        assert_eq!( MaterialConfig::for_platform( PlatformKind::MacOS ).material, MaterialType::FullscreenUi );
        assert_eq!( MaterialConfig::for_platform( PlatformKind::Other ).material, MaterialType::None );
    }


    #[test]
    fn test_serde_field_names() {
        let config = MaterialConfig {
            enabled: true,
            opacity: 0.3,
            material: MaterialType::UnderWindow,
        };
        let json = serde_json::to_value( &config ).unwrap();
        assert_eq!( json[ "type" ], "under-window" );
        assert_eq!( json[ "enabled" ], true );

        // Missing fields fall back to defaults
        let partial: MaterialConfig = serde_json::from_str( r#"{"type":"mica"}"# ).unwrap();
        assert_eq!( partial.material, MaterialType::Mica );
        assert_eq!( partial.opacity, 0.5 );
    }


    #[test]
    fn test_patch_merges_single_field() {
        let mut config = MaterialConfig::for_platform( PlatformKind::Windows );
        MaterialPatch::Opacity( 0.8 ).apply( &mut config );
        assert_eq!( config.opacity, 0.8 );
        assert_eq!( config.material, MaterialType::Acrylic );

        MaterialPatch::Material( MaterialType::Tabbed ).apply( &mut config );
        assert_eq!( config.material, MaterialType::Tabbed );
        assert_eq!( config.opacity, 0.8 );
    }


    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryConfigStore::new( MaterialConfig::for_platform( PlatformKind::Windows ) );
        let mut rx = store.subscribe();

        store.set_config( |c| MaterialPatch::Material( MaterialType::Mica ).apply( c ) );

        rx.changed().await.unwrap();
        assert_eq!( rx.borrow_and_update().material, MaterialType::Mica );
        assert_eq!( store.get_config().await.material, MaterialType::Mica );
    }


    #[tokio::test]
    async fn test_set_without_subscribers() {
        let store = MemoryConfigStore::new( TransportConfig::default() );
        store.set_config( |c| c.enabled = true );
        assert!( store.get_config().await.enabled );
    }
}
