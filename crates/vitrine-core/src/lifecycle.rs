//! Plugin lifecycle glue
//!
//! Both components expose `start` / `on_config_change` / `stop` to the
//! host's plugin manager. `Session` wires them to one host window and
//! drives them from a single event channel.

use std::sync::mpsc;

use crate::config::{ ConfigStore, MaterialConfig, PluginConfig, TransportConfig };
use crate::native::{ NativeWindow, Visibility };
use crate::platform::PlatformKind;
use crate::playback::{ PlaybackEventKind, PlaybackState };
use crate::transport::SongControls;
use crate::transport_binder::TransportBinder;
use crate::window_material::WindowMaterialController;


/// Static plugin descriptor.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct PluginMeta {
    pub id: &'static str,
    pub name_key: &'static str,
    pub description_key: &'static str,

    /// Enabling or disabling only takes effect after a host restart
    pub restart_needed: bool,

    /// Supported platforms; empty means all
    pub platforms: &'static [PlatformKind],
}


impl PluginMeta {
    pub fn supports( &self, kind: PlatformKind ) -> bool {
        self.platforms.is_empty() || self.platforms.contains( &kind )
    }
}


pub const TRANSPARENT_PLAYER: PluginMeta = PluginMeta {
    id: "transparent-player",
    name_key: "plugins.transparent-player.name",
    description_key: "plugins.transparent-player.description",
    restart_needed: true,
    platforms: &[],
};

pub const TASKBAR_MEDIA_CONTROL: PluginMeta = PluginMeta {
    id: "taskbar-mediacontrol",
    name_key: "plugins.taskbar-mediacontrol.name",
    description_key: "plugins.taskbar-mediacontrol.description",
    restart_needed: true,
    platforms: &[ PlatformKind::Windows ],
};


/// Lifecycle hooks called by the host's plugin manager.
pub trait Lifecycle<W> {
    type Config: PluginConfig;

    fn meta( &self ) -> &'static PluginMeta;

    fn start( &mut self, window: W, config: &Self::Config );

    fn on_config_change( &mut self, config: &Self::Config );

    /// Reverts all native side effects on `window`.
    fn stop( &mut self, window: &W );
}


/// Fetches the plugin's config and starts it if enabled on this platform.
///
/// @param plugin - Component to start
/// @param window - Handle passed to `start`
/// @param store - Config store to read from (the only await)
/// @param platform - Running platform
///
/// @returns Whether the plugin was started
pub async fn activate<W, P, S>( plugin: &mut P, window: W, store: &S, platform: PlatformKind ) -> bool
where
    P: Lifecycle<W>,
    S: ConfigStore<P::Config>,
{
    let meta = plugin.meta();
    if !meta.supports( platform ) {
        tracing::debug!( "Plugin '{}' not available on {}", meta.id, platform );
        return false;
    }

    let config = store.get_config().await;
    if !config.enabled() {
        tracing::debug!( "Plugin '{}' is disabled", meta.id );
        return false;
    }

    tracing::info!( "Activating plugin '{}'", meta.id );
    plugin.start( window, &config );
    true
}


/// Events delivered by the host on its event thread.
#[derive( Debug, Clone )]
pub enum HostEvent {
    Playback { state: PlaybackState, kind: PlaybackEventKind },
    Visibility( Visibility ),
    MaterialConfig( MaterialConfig ),
    /// A thumbar button was clicked (index into the button row)
    TransportClicked( usize ),
    Shutdown,
}


/// Creates a channel for host events.
pub fn create_host_channel() -> ( mpsc::Sender<HostEvent>, mpsc::Receiver<HostEvent> ) {
    mpsc::channel()
}


/// Both components bound to one host window.
pub struct Session<W, C> {
    window: W,
    platform: PlatformKind,
    material: WindowMaterialController<W>,
    transport: TransportBinder<W, C>,
    material_active: bool,
    transport_active: bool,
    shut_down: bool,
}


impl<W: NativeWindow + Clone, C: SongControls> Session<W, C> {
    pub fn new( window: W, platform: PlatformKind, transport: TransportBinder<W, C> ) -> Self {
        Self {
            window,
            platform,
            material: WindowMaterialController::new( platform ),
            transport,
            material_active: false,
            transport_active: false,
            shut_down: false,
        }
    }


    /// Activates every enabled component from its config store.
    ///
    /// Components still active from an earlier start are stopped first.
    pub async fn start<M, T>( &mut self, material: &M, transport: &T )
    where
        M: ConfigStore<MaterialConfig>,
        T: ConfigStore<TransportConfig>,
    {
        if self.material_active || self.transport_active {
            tracing::debug!( "Restarting session, stopping active components" );
            self.shutdown();
        }
        self.material_active = activate( &mut self.material, self.window.clone(), material, self.platform ).await;
        self.transport_active = activate( &mut self.transport, self.window.clone(), transport, self.platform ).await;
        self.shut_down = false;
    }


    /// Dispatches all pending events in order.
    ///
    /// @returns false once a `Shutdown` event has been handled
    pub fn pump( &mut self, events: &mpsc::Receiver<HostEvent> ) -> bool {
        while let Ok( event ) = events.try_recv() {
            if !self.dispatch( event ) {
                return false;
            }
        }
        true
    }


    /// Handles one event. Returns false on shutdown.
    pub fn dispatch( &mut self, event: HostEvent ) -> bool {
        match event {
            HostEvent::Playback { state, kind } => {
                if self.transport_active {
                    self.transport.on_playback( &state, kind );
                }
            }
            HostEvent::Visibility( visibility ) => {
                if self.transport_active {
                    self.transport.on_visibility( visibility );
                }
            }
            HostEvent::MaterialConfig( config ) => {
                if self.material_active {
                    self.material.on_config_change( &config );
                }
            }
            HostEvent::TransportClicked( index ) => {
                if self.transport_active {
                    self.transport.click( index );
                }
            }
            HostEvent::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }


    /// Stops every active component. Repeated calls do nothing.
    pub fn shutdown( &mut self ) {
        if self.shut_down {
            return;
        }
        if self.material_active {
            self.material.stop( &self.window );
        }
        if self.transport_active {
            self.transport.stop( &self.window );
        }
        self.material_active = false;
        self.transport_active = false;
        self.shut_down = true;
        tracing::info!( "Session shut down" );
    }


    pub fn material( &self ) -> &WindowMaterialController<W> {
        &self.material
    }


    pub fn transport( &self ) -> &TransportBinder<W, C> {
        &self.transport
    }


    pub fn is_material_active( &self ) -> bool {
        self.material_active
    }


    pub fn is_transport_active( &self ) -> bool {
        self.transport_active
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::icons::IconPaths;
    use crate::material::{ BackgroundMaterial, MaterialType };
    use crate::testing::{ Decoration, NativeCall, RecordingControls, RecordingWindow, StubIconProvider };
    use crate::transport::TransportAction;
    use crate::transport_binder::BinderState;


    fn session( window: &RecordingWindow, platform: PlatformKind ) -> ( Session<RecordingWindow, RecordingControls>, RecordingControls ) {
        let controls = RecordingControls::default();
        let binder = TransportBinder::new( controls.clone(), &StubIconProvider::standard(), &IconPaths::default() );
        ( Session::new( window.clone(), platform, binder ), controls )
    }


    fn enabled_material( material: MaterialType ) -> MemoryConfigStore<MaterialConfig> {
        MemoryConfigStore::new( MaterialConfig { enabled: true, opacity: 0.5, material } )
    }


    #[test]
    fn test_platform_support() {
        assert!( TRANSPARENT_PLAYER.supports( PlatformKind::Other ) );
        assert!( TASKBAR_MEDIA_CONTROL.supports( PlatformKind::Windows ) );
        assert!( !TASKBAR_MEDIA_CONTROL.supports( PlatformKind::MacOS ) );
    }


    #[tokio::test]
    async fn test_activate_respects_enabled() {
        let window = RecordingWindow::new();
        let mut controller = WindowMaterialController::new( PlatformKind::Windows );
        let store = MemoryConfigStore::new( MaterialConfig::for_platform( PlatformKind::Windows ) );

        assert!( !activate( &mut controller, window.clone(), &store, PlatformKind::Windows ).await );
        assert!( window.calls().is_empty() );

        store.set_config( |c| c.enabled = true );
        assert!( activate( &mut controller, window.clone(), &store, PlatformKind::Windows ).await );
        assert_eq!( window.calls()[ 0 ], NativeCall::BackgroundMaterial( Some( BackgroundMaterial::Acrylic ) ) );
    }


    #[tokio::test]
    async fn test_transport_skipped_off_windows() {
        let window = RecordingWindow::new();
        let ( mut session, _ ) = session( &window, PlatformKind::MacOS );
        session.start( &enabled_material( MaterialType::Window ), &MemoryConfigStore::new( TransportConfig { enabled: true } ) ).await;

        assert!( session.is_material_active() );
        assert!( !session.is_transport_active() );
    }


    #[tokio::test]
    async fn test_pump_dispatches_in_order() {
        let window = RecordingWindow::new();
        let ( mut session, controls ) = session( &window, PlatformKind::Windows );
        session.start( &enabled_material( MaterialType::Mica ), &MemoryConfigStore::new( TransportConfig { enabled: true } ) ).await;

        let ( tx, rx ) = create_host_channel();
        tx.send( HostEvent::Playback {
            state: PlaybackState::new( "Song A", false ),
            kind: PlaybackEventKind::TrackChanged,
        }).unwrap();
        tx.send( HostEvent::Playback {
            state: PlaybackState::new( "Song A", false ),
            kind: PlaybackEventKind::TimeChanged,
        }).unwrap();
        tx.send( HostEvent::TransportClicked( 1 ) ).unwrap();
        tx.send( HostEvent::MaterialConfig( MaterialConfig { enabled: true, opacity: 0.5, material: MaterialType::Tabbed } ) ).unwrap();

        assert!( session.pump( &rx ) );
        assert_eq!( window.installs(), 1 );
        assert_eq!( controls.actions(), vec![ TransportAction::PlayPause ] );
        assert_eq!( session.transport().state(), BinderState::Bound );
        assert!( window.calls().contains( &NativeCall::BackgroundMaterial( Some( BackgroundMaterial::Tabbed ) ) ) );
    }


    #[tokio::test]
    async fn test_shutdown_reverts_everything() {
        let window = RecordingWindow::new();
        let ( mut session, _ ) = session( &window, PlatformKind::Windows );
        session.start( &enabled_material( MaterialType::Mica ), &MemoryConfigStore::new( TransportConfig { enabled: true } ) ).await;

        let ( tx, rx ) = create_host_channel();
        tx.send( HostEvent::Playback {
            state: PlaybackState::new( "Song A", true ),
            kind: PlaybackEventKind::TrackChanged,
        }).unwrap();
        tx.send( HostEvent::Shutdown ).unwrap();
        tx.send( HostEvent::Visibility( Visibility::Shown ) ).unwrap();

        assert!( !session.pump( &rx ) );
        assert_eq!( window.decoration(), None );
        assert!( window.thumbar().is_empty() );

        let calls = window.calls().len();
        session.shutdown();
        assert_eq!( window.calls().len(), calls );
    }


    #[tokio::test]
    async fn test_restart_with_components_disabled() {
        let window = RecordingWindow::new();
        let ( mut session, _ ) = session( &window, PlatformKind::Windows );
        let material = enabled_material( MaterialType::Mica );
        let transport = MemoryConfigStore::new( TransportConfig { enabled: true } );
        session.start( &material, &transport ).await;

        session.dispatch( HostEvent::Playback {
            state: PlaybackState::new( "Song A", false ),
            kind: PlaybackEventKind::TrackChanged,
        });
        assert_eq!( window.thumbar().len(), 3 );

        material.set_config( |c| c.enabled = false );
        transport.set_config( |c| c.enabled = false );
        session.start( &material, &transport ).await;

        assert!( !session.is_material_active() );
        assert!( !session.is_transport_active() );
        assert_eq!( window.decoration(), None );
        assert!( window.thumbar().is_empty() );

        session.shutdown();
        assert_eq!( window.decoration(), None );
        assert!( window.thumbar().is_empty() );
    }


    #[tokio::test]
    async fn test_restart_keeps_single_surface() {
        let window = RecordingWindow::new();
        let ( mut session, _ ) = session( &window, PlatformKind::Windows );
        let material = enabled_material( MaterialType::Tabbed );
        let transport = MemoryConfigStore::new( TransportConfig { enabled: true } );
        let playing = HostEvent::Playback {
            state: PlaybackState::new( "Song A", true ),
            kind: PlaybackEventKind::TrackChanged,
        };

        session.start( &material, &transport ).await;
        session.dispatch( playing.clone() );
        session.start( &material, &transport ).await;
        session.dispatch( playing );

        assert!( session.is_material_active() );
        assert_eq!( window.decoration(), Some( Decoration::Backdrop( BackgroundMaterial::Tabbed ) ) );
        assert_eq!( window.thumbar().len(), 3 );
        assert_eq!( session.transport().state(), BinderState::Bound );

        assert!( !session.dispatch( HostEvent::Shutdown ) );
        assert_eq!( window.decoration(), None );
        assert!( window.thumbar().is_empty() );
    }


    #[test]
    fn test_shutdown_before_start() {
        let window = RecordingWindow::new();
        let ( mut session, _ ) = session( &window, PlatformKind::Windows );
        session.shutdown();
        assert!( window.calls().is_empty() );
    }
}
