//! Taskbar transport surface binder
//!
//! Mirrors playback state onto the window's thumbar buttons. Windows clears
//! the thumbar when a window is hidden and restored, so the last surface is
//! re-installed on every show.
//!
//! `last_known` is written by the playback handler and read by the
//! visibility handler. Both run on the host's event thread, so no locking
//! is involved.

use crate::config::TransportConfig;
use crate::icons::{ IconPaths, IconProvider, IconSet };
use crate::lifecycle::{ Lifecycle, PluginMeta, TASKBAR_MEDIA_CONTROL };
use crate::native::{ report, NativeWindow, Visibility };
use crate::playback::{ PlaybackEventKind, PlaybackState };
use crate::transport::{ SongControls, TransportButtonSet };


/// Binder state for one host window.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum BinderState {
    /// No playback state seen yet.
    Uninitialized,

    /// No active track; surface intentionally absent.
    Idle,

    /// Surface installed from the cached state.
    Bound,
}


/// Keeps the thumbar transport buttons in sync with playback.
pub struct TransportBinder<W, C> {
    controls: C,
    icons: IconSet,
    window: Option<W>,
    state: BinderState,
    last_known: Option<PlaybackState>,
    surface: Option<TransportButtonSet>,
}


impl<W: NativeWindow, C: SongControls> TransportBinder<W, C> {
    /// Creates a binder, loading the four transport icons once.
    pub fn new( controls: C, provider: &dyn IconProvider, paths: &IconPaths ) -> Self {
        Self::with_icons( controls, IconSet::load( provider, paths ) )
    }


    pub fn with_icons( controls: C, icons: IconSet ) -> Self {
        Self {
            controls,
            icons,
            window: None,
            state: BinderState::Uninitialized,
            last_known: None,
            surface: None,
        }
    }


    /// Attaches to `window`. No surface is installed until a track is playing.
    ///
    /// A surface left on a previously attached window is cleared first.
    pub fn start( &mut self, window: W ) {
        tracing::info!( "Starting taskbar transport controls" );
        if let Some( previous ) = self.window.take() {
            if self.surface.is_some() {
                report( "clear thumbar buttons", previous.set_thumbar_buttons( &[] ) );
            }
        }
        self.window = Some( window );
        self.state = BinderState::Uninitialized;
        self.last_known = None;
        self.surface = None;
    }


    /// Handles a playback engine notification.
    ///
    /// Time-only updates are ignored; everything else rebuilds the surface.
    pub fn on_playback( &mut self, playback: &PlaybackState, kind: PlaybackEventKind ) {
        if kind.is_time_only() {
            return;
        }

        let Some( window ) = self.window.as_ref() else {
            return;
        };

        tracing::debug!( "Playback {:?}: title={:?}, paused={}", kind, playback.title, playback.is_paused );
        self.last_known = Some( playback.clone() );

        if playback.has_track() {
            let surface = TransportButtonSet::build( playback, &self.icons );
            report( "install thumbar buttons", window.set_thumbar_buttons( surface.buttons() ) );
            self.surface = Some( surface );
            self.state = BinderState::Bound;
        } else {
            if self.surface.take().is_some() {
                report( "clear thumbar buttons", window.set_thumbar_buttons( &[] ) );
            }
            self.state = BinderState::Idle;
        }
    }


    /// Handles a window visibility change.
    pub fn on_visibility( &mut self, visibility: Visibility ) {
        if visibility != Visibility::Shown || self.state != BinderState::Bound {
            return;
        }

        if let ( Some( window ), Some( surface ) ) = ( self.window.as_ref(), self.surface.as_ref() ) {
            tracing::debug!( "Window shown, re-installing thumbar buttons" );
            report( "install thumbar buttons", window.set_thumbar_buttons( surface.buttons() ) );
        }
    }


    /// Invokes the action of the installed button at `index`.
    pub fn click( &self, index: usize ) {
        let action = self.surface.as_ref()
            .and_then( |s| s.buttons().get( index ) )
            .map( |b| b.action );

        match action {
            Some( action ) => action.invoke( &self.controls ),
            None => tracing::debug!( "Ignoring click on thumbar button {}", index ),
        }
    }


    /// Removes the surface from `window` and forgets all state.
    ///
    /// Safe to call without a prior `start`.
    pub fn stop( &mut self, window: &W ) {
        tracing::info!( "Stopping taskbar transport controls" );
        report( "clear thumbar buttons", window.set_thumbar_buttons( &[] ) );
        self.window = None;
        self.state = BinderState::Uninitialized;
        self.last_known = None;
        self.surface = None;
    }


    pub fn state( &self ) -> BinderState {
        self.state
    }


    pub fn last_known( &self ) -> Option<&PlaybackState> {
        self.last_known.as_ref()
    }


    pub fn surface( &self ) -> Option<&TransportButtonSet> {
        self.surface.as_ref()
    }
}


impl<W: NativeWindow, C: SongControls> Lifecycle<W> for TransportBinder<W, C> {
    type Config = TransportConfig;


    fn meta( &self ) -> &'static PluginMeta {
        &TASKBAR_MEDIA_CONTROL
    }


    fn start( &mut self, window: W, _config: &TransportConfig ) {
        TransportBinder::start( self, window );
    }


    fn on_config_change( &mut self, _config: &TransportConfig ) {
        // Takes effect on restart
    }


    fn stop( &mut self, window: &W ) {
        TransportBinder::stop( self, window );
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::icons::IconKind;
    use crate::testing::{ NativeCall, RecordingControls, RecordingWindow, StubIconProvider };
    use crate::transport::TransportAction;


    fn binder() -> ( TransportBinder<RecordingWindow, RecordingControls>, RecordingWindow, RecordingControls ) {
        let window = RecordingWindow::new();
        let controls = RecordingControls::default();
        let mut binder = TransportBinder::new( controls.clone(), &StubIconProvider::standard(), &IconPaths::default() );
        binder.start( window.clone() );
        ( binder, window, controls )
    }


    #[test]
    fn test_time_only_event_is_ignored() {
        let ( mut binder, window, _ ) = binder();
        binder.on_playback( &PlaybackState::new( "Song A", false ), PlaybackEventKind::TrackChanged );
        binder.on_playback( &PlaybackState::new( "Song A", false ), PlaybackEventKind::TimeChanged );

        assert_eq!( window.installs(), 1 );
        assert_eq!( binder.state(), BinderState::Bound );
    }


    #[test]
    fn test_time_only_event_does_not_touch_cache() {
        let ( mut binder, _, _ ) = binder();
        binder.on_playback( &PlaybackState::new( "Song A", true ), PlaybackEventKind::PlayOrPaused );
        binder.on_playback( &PlaybackState::new( "Song B", false ), PlaybackEventKind::TimeChanged );
        assert_eq!( binder.last_known().map( |s| s.title.as_str() ), Some( "Song A" ) );
    }


    #[test]
    fn test_every_other_event_rebuilds() {
        let ( mut binder, window, _ ) = binder();
        let state = PlaybackState::new( "Song A", false );
        for kind in [ PlaybackEventKind::TrackChanged, PlaybackEventKind::PlayOrPaused, PlaybackEventKind::MetadataChanged ] {
            binder.on_playback( &state, kind );
        }
        assert_eq!( window.installs(), 3 );
    }


    #[test]
    fn test_no_surface_without_title() {
        let ( mut binder, window, _ ) = binder();
        binder.on_playback( &PlaybackState::new( "", false ), PlaybackEventKind::TrackChanged );
        binder.on_visibility( Visibility::Shown );

        assert_eq!( binder.state(), BinderState::Idle );
        assert!( window.calls().is_empty() );
        assert!( binder.surface().is_none() );

        binder.on_playback( &PlaybackState::new( "Song A", false ), PlaybackEventKind::TrackChanged );
        assert_eq!( window.installs(), 1 );
        assert_eq!( binder.state(), BinderState::Bound );
    }


    #[test]
    fn test_losing_track_clears_surface() {
        let ( mut binder, window, _ ) = binder();
        binder.on_playback( &PlaybackState::new( "Song A", false ), PlaybackEventKind::TrackChanged );
        binder.on_playback( &PlaybackState::default(), PlaybackEventKind::TrackChanged );

        assert_eq!( binder.state(), BinderState::Idle );
        assert!( window.thumbar().is_empty() );
        assert_eq!( window.calls().last(), Some( &NativeCall::Thumbar( Vec::new() ) ) );
    }


    #[test]
    fn test_shown_reinstalls_cached_surface() {
        let ( mut binder, window, _ ) = binder();
        binder.on_playback( &PlaybackState::new( "Song A", true ), PlaybackEventKind::PlayOrPaused );
        let installed = window.thumbar();

        binder.on_visibility( Visibility::Hidden );
        window.drop_thumbar();
        binder.on_visibility( Visibility::Shown );

        assert_eq!( window.installs(), 2 );
        assert_eq!( window.thumbar(), installed );
        assert_eq!( binder.surface().map( |s| s.buttons().to_vec() ), Some( installed ) );
    }


    #[test]
    fn test_shown_before_any_playback() {
        let ( mut binder, window, _ ) = binder();
        binder.on_visibility( Visibility::Shown );
        assert_eq!( binder.state(), BinderState::Uninitialized );
        assert!( window.calls().is_empty() );
    }


    #[test]
    fn test_toggle_icon_tracks_every_state() {
        let ( mut binder, window, _ ) = binder();
        let icons = IconSet::load( &StubIconProvider::standard(), &IconPaths::default() );

        for paused in [ false, true, true, false ] {
            binder.on_playback( &PlaybackState::new( "Song A", paused ), PlaybackEventKind::PlayOrPaused );
            let expected = if paused { IconKind::Play } else { IconKind::Pause };
            assert_eq!( window.thumbar()[ 1 ].icon, *icons.get( expected ) );
        }
    }


    #[test]
    fn test_click_invokes_toggle() {
        let ( mut binder, _, controls ) = binder();
        binder.click( 1 );
        assert!( controls.actions().is_empty() );

        binder.on_playback( &PlaybackState::new( "Song A", false ), PlaybackEventKind::TrackChanged );
        binder.click( 0 );
        binder.click( 1 );
        binder.click( 2 );
        binder.click( 7 );

        assert_eq!( controls.actions(), vec![
            TransportAction::Previous, TransportAction::PlayPause, TransportAction::Next,
        ]);
    }


    #[test]
    fn test_stop_clears_surface() {
        let ( mut binder, window, _ ) = binder();
        binder.on_playback( &PlaybackState::new( "Song A", false ), PlaybackEventKind::TrackChanged );
        binder.stop( &window );

        assert!( window.thumbar().is_empty() );
        assert_eq!( binder.state(), BinderState::Uninitialized );
        assert!( binder.last_known().is_none() );

        // Events after stop have no window to act on
        binder.on_playback( &PlaybackState::new( "Song B", false ), PlaybackEventKind::TrackChanged );
        assert_eq!( window.installs(), 1 );
        assert!( binder.last_known().is_none() );
        assert_eq!( binder.state(), BinderState::Uninitialized );
    }


    #[test]
    fn test_restart_clears_installed_surface() {
        let ( mut binder, window, _ ) = binder();
        binder.on_playback( &PlaybackState::new( "Song A", false ), PlaybackEventKind::TrackChanged );

        binder.start( window.clone() );
        assert!( window.thumbar().is_empty() );
        assert!( binder.surface().is_none() );

        binder.on_playback( &PlaybackState::default(), PlaybackEventKind::TrackChanged );
        assert_eq!( binder.state(), BinderState::Idle );
        assert!( window.thumbar().is_empty() );
    }


    #[test]
    fn test_restart_on_new_window() {
        let ( mut binder, first, _ ) = binder();
        binder.on_playback( &PlaybackState::new( "Song A", false ), PlaybackEventKind::TrackChanged );

        let second = RecordingWindow::new();
        binder.start( second.clone() );
        binder.on_playback( &PlaybackState::new( "Song B", true ), PlaybackEventKind::TrackChanged );

        assert!( first.thumbar().is_empty() );
        assert_eq!( second.installs(), 1 );
        assert_eq!( binder.last_known().map( |s| s.title.as_str() ), Some( "Song B" ) );
    }


    #[test]
    fn test_restart_while_idle_issues_no_clear() {
        let ( mut binder, window, _ ) = binder();
        binder.on_playback( &PlaybackState::default(), PlaybackEventKind::TrackChanged );
        binder.start( window.clone() );
        assert!( window.calls().is_empty() );
    }


    #[test]
    fn test_stop_without_start() {
        let window = RecordingWindow::unsupported();
        let mut binder: TransportBinder<RecordingWindow, RecordingControls> =
            TransportBinder::new( RecordingControls::default(), &StubIconProvider::standard(), &IconPaths::default() );
        binder.stop( &window );
        assert_eq!( binder.state(), BinderState::Uninitialized );
    }


    #[test]
    fn test_missing_icons_still_bind() {
        let window = RecordingWindow::new();
        let provider = StubIconProvider::standard().without( IconKind::Pause ).without( IconKind::Next );
        let mut binder = TransportBinder::new( RecordingControls::default(), &provider, &IconPaths::default() );
        binder.start( window.clone() );
        binder.on_playback( &PlaybackState::new( "Song A", false ), PlaybackEventKind::TrackChanged );

        let buttons = window.thumbar();
        assert_eq!( buttons.len(), 3 );
        assert!( buttons[ 1 ].icon.is_empty() );
        assert!( buttons[ 2 ].icon.is_empty() );
        assert!( !buttons[ 0 ].icon.is_empty() );
    }
}
