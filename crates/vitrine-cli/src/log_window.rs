//! Stand-in host window that logs native calls instead of performing them.

use std::cell::Cell;
use std::rc::Rc;

use vitrine_core::material::{ BackgroundMaterial, Vibrancy };
use vitrine_core::{ NativeError, NativeWindow, Rgba, TransportButton };


/// Logs every native call. Clones share the call counter.
#[derive( Debug, Clone, Default )]
pub struct LogWindow {
    calls: Rc<Cell<usize>>,
}


impl LogWindow {
    pub fn new() -> Self {
        Self::default()
    }


    /// Number of native calls made so far.
    pub fn calls( &self ) -> usize {
        self.calls.get()
    }


    fn count( &self ) {
        self.calls.set( self.calls.get() + 1 );
    }
}


impl NativeWindow for LogWindow {
    fn set_background_material( &self, material: Option<BackgroundMaterial> ) -> Result<(), NativeError> {
        self.count();
        match material {
            Some( m ) => tracing::info!( "[window] background material -> {:?}", m ),
            None => tracing::info!( "[window] background material cleared" ),
        }
        Ok(())
    }


    fn set_vibrancy( &self, vibrancy: Option<Vibrancy> ) -> Result<(), NativeError> {
        self.count();
        match vibrancy {
            Some( v ) => tracing::info!( "[window] vibrancy -> {:?}", v ),
            None => tracing::info!( "[window] vibrancy cleared" ),
        }
        Ok(())
    }


    fn set_background_color( &self, color: Rgba ) -> Result<(), NativeError> {
        self.count();
        tracing::info!( "[window] background color -> {}", color );
        Ok(())
    }


    fn set_thumbar_buttons( &self, buttons: &[TransportButton] ) -> Result<(), NativeError> {
        self.count();
        if buttons.is_empty() {
            tracing::info!( "[window] thumbar cleared" );
            return Ok(());
        }

        let row: Vec<String> = buttons.iter()
            .map( |b| format!( "{} ({:?}, {}x{})", b.tooltip, b.action, b.icon.width(), b.icon.height() ) )
            .collect();
        tracing::info!( "[window] thumbar -> [{}]", row.join( ", " ) );
        Ok(())
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_clones_share_counter() {
        let window = LogWindow::new();
        let clone = window.clone();
        clone.set_background_color( Rgba::tint( 0.4 ) ).unwrap();
        window.set_thumbar_buttons( &[] ).unwrap();
        assert_eq!( window.calls(), 2 );
    }
}
