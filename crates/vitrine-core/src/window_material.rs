//! Window material controller
//!
//! Applies the configured material and background tint to the host window
//! and reverts the material when stopped.

use crate::config::MaterialConfig;
use crate::effect::{ effect_sink, WindowEffectSink };
use crate::lifecycle::{ Lifecycle, PluginMeta, TRANSPARENT_PLAYER };
use crate::material::{ MaterialType, Rgba };
use crate::native::{ report, NativeWindow };
use crate::platform::PlatformKind;


/// Last material and opacity applied to the window.
#[derive( Debug, Clone, Copy, PartialEq )]
pub struct WindowMaterialState {
    pub material: MaterialType,
    pub opacity: f32,
}


/// Keeps the window material in sync with the config.
pub struct WindowMaterialController<W> {
    sink: Box<dyn WindowEffectSink>,
    window: Option<W>,
    applied: Option<WindowMaterialState>,
}


impl<W: NativeWindow> WindowMaterialController<W> {
    /// Creates a controller dispatching to the given platform's effect API.
    pub fn new( platform: PlatformKind ) -> Self {
        Self::with_sink( effect_sink( platform ) )
    }


    pub fn with_sink( sink: Box<dyn WindowEffectSink> ) -> Self {
        Self {
            sink,
            window: None,
            applied: None,
        }
    }


    /// Starts decorating `window` with the configured material and tint.
    ///
    /// A previously decorated window is reverted first.
    pub fn start( &mut self, window: W, config: &MaterialConfig ) {
        tracing::info!(
            "Starting window material: type={}, opacity={}, sink={}",
            config.material, config.opacity, self.sink.name()
        );

        if let Some( previous ) = self.window.take() {
            if self.applied.is_some_and( |s| s.material != MaterialType::None ) {
                self.sink.apply( &previous, MaterialType::None );
            }
        }

        self.sink.apply( &window, config.material );
        apply_tint( &window, config.opacity );

        self.applied = Some( WindowMaterialState {
            material: config.material,
            opacity: config.opacity,
        });
        self.window = Some( window );
    }


    /// Re-applies whatever changed in the config.
    ///
    /// A repeated material produces no native call.
    pub fn on_config_change( &mut self, config: &MaterialConfig ) {
        let Some( window ) = self.window.as_ref() else {
            tracing::debug!( "Material config changed with no active window" );
            return;
        };

        let previous = self.applied;

        if previous.map( |s| s.material ) != Some( config.material ) {
            tracing::debug!( "Material changed to {}", config.material );
            self.sink.apply( window, config.material );
        }

        if previous.map( |s| s.opacity ) != Some( config.opacity ) {
            tracing::debug!( "Tint opacity changed to {}", config.opacity );
            apply_tint( window, config.opacity );
        }

        self.applied = Some( WindowMaterialState {
            material: config.material,
            opacity: config.opacity,
        });
    }


    /// Reverts `window` to its undecorated state and forgets it.
    ///
    /// Safe to call without a prior `start`.
    pub fn stop( &mut self, window: &W ) {
        tracing::info!( "Stopping window material" );
        self.sink.apply( window, MaterialType::None );
        self.window = None;
        self.applied = None;
    }


    pub fn applied( &self ) -> Option<WindowMaterialState> {
        self.applied
    }


    pub fn is_active( &self ) -> bool {
        self.window.is_some()
    }
}


fn apply_tint( window: &dyn NativeWindow, opacity: f32 ) {
    report( "set background tint", window.set_background_color( Rgba::tint( opacity ) ) );
}


impl<W: NativeWindow> Lifecycle<W> for WindowMaterialController<W> {
    type Config = MaterialConfig;


    fn meta( &self ) -> &'static PluginMeta {
        &TRANSPARENT_PLAYER
    }


    fn start( &mut self, window: W, config: &MaterialConfig ) {
        WindowMaterialController::start( self, window, config );
    }


    fn on_config_change( &mut self, config: &MaterialConfig ) {
        WindowMaterialController::on_config_change( self, config );
    }


    fn stop( &mut self, window: &W ) {
        WindowMaterialController::stop( self, window );
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::material::{ BackgroundMaterial, Vibrancy };
    use crate::platform::material_options;
    use crate::testing::{ Decoration, NativeCall, RecordingWindow };


    fn config( material: MaterialType, opacity: f32 ) -> MaterialConfig {
        MaterialConfig { enabled: true, opacity, material }
    }


    #[test]
    fn test_mica_on_windows() {
        let window = RecordingWindow::new();
        let mut controller = WindowMaterialController::new( PlatformKind::Windows );
        controller.start( window.clone(), &config( MaterialType::Mica, 0.5 ) );

        let calls = window.calls();
        let backdrop: Vec<_> = calls.iter().filter( |c| matches!( c, NativeCall::BackgroundMaterial( _ ) ) ).collect();
        assert_eq!( backdrop, vec![ &NativeCall::BackgroundMaterial( Some( BackgroundMaterial::Mica ) ) ] );
        assert!( !calls.iter().any( |c| matches!( c, NativeCall::Vibrancy( _ ) ) ) );
        assert!( calls.contains( &NativeCall::BackgroundColor( Rgba::tint( 0.5 ) ) ) );
    }


    #[test]
    fn test_fullscreen_ui_on_macos() {
        let window = RecordingWindow::new();
        let mut controller = WindowMaterialController::new( PlatformKind::MacOS );
        controller.start( window.clone(), &config( MaterialType::FullscreenUi, 0.2 ) );

        let calls = window.calls();
        let vibrancy: Vec<_> = calls.iter().filter( |c| matches!( c, NativeCall::Vibrancy( _ ) ) ).collect();
        assert_eq!( vibrancy, vec![ &NativeCall::Vibrancy( Some( Vibrancy::FullscreenUi ) ) ] );
        assert!( !calls.iter().any( |c| matches!( c, NativeCall::BackgroundMaterial( _ ) ) ) );
    }


    #[test]
    fn test_other_platform_only_tints() {
        let window = RecordingWindow::new();
        let mut controller = WindowMaterialController::new( PlatformKind::Other );
        controller.start( window.clone(), &config( MaterialType::None, 0.7 ) );
        assert_eq!( window.calls(), vec![ NativeCall::BackgroundColor( Rgba::tint( 0.7 ) ) ] );
    }


    #[test]
    fn test_apply_then_revert_restores_decoration() {
        for platform in [ PlatformKind::Windows, PlatformKind::MacOS, PlatformKind::Other ] {
            for &material in material_options( platform ) {
                let window = RecordingWindow::new();
                let before = window.decoration();

                let mut controller = WindowMaterialController::new( platform );
                controller.start( window.clone(), &config( material, 0.5 ) );
                controller.stop( &window );

                assert_eq!( window.decoration(), before, "{:?} {:?}", platform, material );
                assert!( !controller.is_active() );
            }
        }
    }


    #[test]
    fn test_same_material_twice_is_one_call() {
        let window = RecordingWindow::new();
        let mut controller = WindowMaterialController::new( PlatformKind::Windows );
        controller.start( window.clone(), &config( MaterialType::Acrylic, 0.5 ) );
        window.clear_calls();

        controller.on_config_change( &config( MaterialType::Tabbed, 0.5 ) );
        controller.on_config_change( &config( MaterialType::Tabbed, 0.5 ) );

        assert_eq!( window.calls(), vec![ NativeCall::BackgroundMaterial( Some( BackgroundMaterial::Tabbed ) ) ] );
        assert_eq!( window.decoration(), Some( Decoration::Backdrop( BackgroundMaterial::Tabbed ) ) );
    }


    #[test]
    fn test_opacity_change_retints_only() {
        let window = RecordingWindow::new();
        let mut controller = WindowMaterialController::new( PlatformKind::Windows );
        controller.start( window.clone(), &config( MaterialType::Mica, 0.5 ) );
        window.clear_calls();

        controller.on_config_change( &config( MaterialType::Mica, 0.9 ) );

        assert_eq!( window.calls(), vec![ NativeCall::BackgroundColor( Rgba::tint( 0.9 ) ) ] );
        assert_eq!( controller.applied().map( |s| s.opacity ), Some( 0.9 ) );
    }


    #[test]
    fn test_config_change_without_window() {
        let mut controller = WindowMaterialController::<RecordingWindow>::new( PlatformKind::Windows );
        controller.on_config_change( &config( MaterialType::Mica, 0.5 ) );
        assert_eq!( controller.applied(), None );
    }


    #[test]
    fn test_stop_without_start() {
        let window = RecordingWindow::new();
        let mut controller = WindowMaterialController::new( PlatformKind::Windows );
        controller.stop( &window );
        assert_eq!( window.calls(), vec![ NativeCall::BackgroundMaterial( None ) ] );

        let mut mac = WindowMaterialController::new( PlatformKind::MacOS );
        mac.stop( &window );
        assert_eq!( window.calls().last(), Some( &NativeCall::Vibrancy( None ) ) );
    }


    #[test]
    fn test_restart_reverts_previous_window() {
        let first = RecordingWindow::new();
        let second = RecordingWindow::new();
        let mut controller = WindowMaterialController::new( PlatformKind::Windows );
        controller.start( first.clone(), &config( MaterialType::Mica, 0.5 ) );
        controller.start( second.clone(), &config( MaterialType::Acrylic, 0.5 ) );

        assert_eq!( first.decoration(), None );
        assert_eq!( second.decoration(), Some( Decoration::Backdrop( BackgroundMaterial::Acrylic ) ) );

        controller.stop( &second );
        assert_eq!( second.decoration(), None );
    }


    #[test]
    fn test_restart_on_same_window() {
        let window = RecordingWindow::new();
        let mut controller = WindowMaterialController::new( PlatformKind::MacOS );
        controller.start( window.clone(), &config( MaterialType::Content, 0.5 ) );
        controller.start( window.clone(), &config( MaterialType::UnderPage, 0.3 ) );

        assert_eq!( window.decoration(), Some( Decoration::Vibrancy( Vibrancy::UnderPage ) ) );
        assert_eq!( controller.applied(), Some( WindowMaterialState { material: MaterialType::UnderPage, opacity: 0.3 } ) );
    }


    #[test]
    fn test_capability_gap_is_silent() {
        let window = RecordingWindow::unsupported();
        let mut controller = WindowMaterialController::new( PlatformKind::Windows );
        controller.start( window.clone(), &config( MaterialType::Mica, 0.5 ) );
        controller.on_config_change( &config( MaterialType::Acrylic, 0.5 ) );
        controller.stop( &window );

        assert_eq!( window.decoration(), None );
    }


    #[test]
    fn test_native_failure_is_not_fatal() {
        let window = RecordingWindow::failing();
        let mut controller = WindowMaterialController::new( PlatformKind::MacOS );
        controller.start( window.clone(), &config( MaterialType::Content, 0.5 ) );

        // State still tracks the request so a later change is compared against it
        assert_eq!( controller.applied().map( |s| s.material ), Some( MaterialType::Content ) );
    }
}
