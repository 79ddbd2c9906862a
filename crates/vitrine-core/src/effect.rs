//! Platform-specific window effect dispatch
//!
//! One sink is selected per platform at construction, so callers never
//! check at runtime whether a native method exists.

use crate::material::MaterialType;
use crate::native::{ report, NativeWindow };
use crate::platform::PlatformKind;


/// Routes a material to the native effect API of one platform.
pub trait WindowEffectSink {
    /// Applies `material` to `window`. `MaterialType::None` clears the effect.
    fn apply( &self, window: &dyn NativeWindow, material: MaterialType );

    fn name( &self ) -> &'static str;
}


/// Windows: system backdrop API only.
#[derive( Debug, Default )]
pub struct WindowsEffectSink;


/// macOS: vibrancy API only.
#[derive( Debug, Default )]
pub struct MacEffectSink;


/// Platforms without a material API.
#[derive( Debug, Default )]
pub struct NullEffectSink;


impl WindowEffectSink for WindowsEffectSink {
    fn apply( &self, window: &dyn NativeWindow, material: MaterialType ) {
        let backdrop = match ( material, material.background_material() ) {
            ( MaterialType::None, _ ) => None,
            ( _, Some( backdrop ) ) => Some( backdrop ),
            ( other, None ) => {
                tracing::debug!( "Material '{}' has no Windows backdrop, skipping", other );
                return;
            }
        };
        report( "set background material", window.set_background_material( backdrop ) );
    }


    fn name( &self ) -> &'static str {
        "windows"
    }
}


impl WindowEffectSink for MacEffectSink {
    fn apply( &self, window: &dyn NativeWindow, material: MaterialType ) {
        let vibrancy = match ( material, material.vibrancy() ) {
            ( MaterialType::None, _ ) => None,
            ( _, Some( vibrancy ) ) => Some( vibrancy ),
            ( other, None ) => {
                tracing::debug!( "Material '{}' has no macOS vibrancy, skipping", other );
                return;
            }
        };
        report( "set vibrancy", window.set_vibrancy( vibrancy ) );
    }


    fn name( &self ) -> &'static str {
        "macos"
    }
}


impl WindowEffectSink for NullEffectSink {
    fn apply( &self, _window: &dyn NativeWindow, _material: MaterialType ) {}


    fn name( &self ) -> &'static str {
        "null"
    }
}


/// Selects the effect sink for a platform.
pub fn effect_sink( kind: PlatformKind ) -> Box<dyn WindowEffectSink> {
    match kind {
        PlatformKind::Windows => Box::new( WindowsEffectSink ),
        PlatformKind::MacOS => Box::new( MacEffectSink ),
        PlatformKind::Other => Box::new( NullEffectSink ),
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::material::{ BackgroundMaterial, Vibrancy };
    use crate::testing::{ NativeCall, RecordingWindow };


    #[test]
    fn test_windows_sink_uses_backdrop_api() {
        let window = RecordingWindow::new();
        WindowsEffectSink.apply( &window, MaterialType::Tabbed );
        WindowsEffectSink.apply( &window, MaterialType::None );

        assert_eq!( window.calls(), vec![
            NativeCall::BackgroundMaterial( Some( BackgroundMaterial::Tabbed ) ),
            NativeCall::BackgroundMaterial( None ),
        ]);
    }


    #[test]
    fn test_mac_sink_uses_vibrancy_api() {
        let window = RecordingWindow::new();
        MacEffectSink.apply( &window, MaterialType::UnderPage );
        MacEffectSink.apply( &window, MaterialType::None );

        assert_eq!( window.calls(), vec![
            NativeCall::Vibrancy( Some( Vibrancy::UnderPage ) ),
            NativeCall::Vibrancy( None ),
        ]);
    }


    #[test]
    fn test_foreign_material_is_skipped() {
        let window = RecordingWindow::new();
        WindowsEffectSink.apply( &window, MaterialType::Content );
        MacEffectSink.apply( &window, MaterialType::Mica );
        assert!( window.calls().is_empty() );
    }


    #[test]
    fn test_null_sink_never_calls() {
        let window = RecordingWindow::new();
        for material in MaterialType::ALL {
            NullEffectSink.apply( &window, material );
        }
        assert!( window.calls().is_empty() );
    }


    #[test]
    fn test_unsupported_api_is_silent() {
        let window = RecordingWindow::unsupported();
        WindowsEffectSink.apply( &window, MaterialType::Mica );
        MacEffectSink.apply( &window, MaterialType::Window );
        // Attempts are made, failures are swallowed
        assert_eq!( window.calls().len(), 2 );
        assert_eq!( window.decoration(), None );
    }


    #[test]
    fn test_effect_sink_selection() {
        assert_eq!( effect_sink( PlatformKind::Windows ).name(), "windows" );
        assert_eq!( effect_sink( PlatformKind::MacOS ).name(), "macos" );
        assert_eq!( effect_sink( PlatformKind::Other ).name(), "null" );
    }
}
