//! Test doubles for the native window and playback collaborators.

use std::cell::{ Cell, RefCell };
use std::collections::HashMap;
use std::path::{ Path, PathBuf };
use std::rc::Rc;

use image::{ Rgba as Pixel, RgbaImage };

use crate::icons::{ IconKind, IconPaths, IconProvider, ImageHandle };
use crate::material::{ BackgroundMaterial, Rgba, Vibrancy };
use crate::native::{ NativeError, NativeWindow };
use crate::transport::{ SongControls, TransportAction, TransportButton };


/// One recorded native call.
#[derive( Debug, Clone, PartialEq )]
pub enum NativeCall {
    BackgroundMaterial( Option<BackgroundMaterial> ),
    Vibrancy( Option<Vibrancy> ),
    BackgroundColor( Rgba ),
    Thumbar( Vec<TransportButton> ),
}


/// Decoration currently in effect on a recording window.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Decoration {
    Backdrop( BackgroundMaterial ),
    Vibrancy( Vibrancy ),
}


#[derive( Debug, Clone, Copy, PartialEq, Eq )]
enum Mode {
    Working,
    Unsupported,
    Failing,
}


#[derive( Debug )]
struct Inner {
    mode: Mode,
    calls: Vec<NativeCall>,
    decoration: Option<Decoration>,
    thumbar: Vec<TransportButton>,
}


/// Native window that records every call. Clones share the same record.
#[derive( Debug, Clone )]
pub struct RecordingWindow {
    inner: Rc<RefCell<Inner>>,
}


impl RecordingWindow {
    pub fn new() -> Self {
        Self::with_mode( Mode::Working )
    }


    /// Window on an OS build lacking every native API.
    pub fn unsupported() -> Self {
        Self::with_mode( Mode::Unsupported )
    }


    /// Window whose native calls fail outright.
    pub fn failing() -> Self {
        Self::with_mode( Mode::Failing )
    }


    fn with_mode( mode: Mode ) -> Self {
        Self {
            inner: Rc::new( RefCell::new( Inner {
                mode,
                calls: Vec::new(),
                decoration: None,
                thumbar: Vec::new(),
            })),
        }
    }


    pub fn calls( &self ) -> Vec<NativeCall> {
        self.inner.borrow().calls.clone()
    }


    pub fn clear_calls( &self ) {
        self.inner.borrow_mut().calls.clear();
    }


    pub fn decoration( &self ) -> Option<Decoration> {
        self.inner.borrow().decoration
    }


    pub fn thumbar( &self ) -> Vec<TransportButton> {
        self.inner.borrow().thumbar.clone()
    }


    /// Number of non-empty thumbar installs recorded.
    pub fn installs( &self ) -> usize {
        self.inner.borrow().calls.iter()
            .filter( |c| matches!( c, NativeCall::Thumbar( b ) if !b.is_empty() ) )
            .count()
    }


    /// Simulates the OS dropping the thumbar while the window is hidden.
    pub fn drop_thumbar( &self ) {
        self.inner.borrow_mut().thumbar.clear();
    }


    fn record( &self, call: NativeCall ) -> Result<(), NativeError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push( call.clone() );

        match inner.mode {
            Mode::Unsupported => return Err( NativeError::Unsupported( "not on this build".into() ) ),
            Mode::Failing => return Err( NativeError::Failed( "access denied".into() ) ),
            Mode::Working => {}
        }

        match call {
            NativeCall::BackgroundMaterial( m ) => inner.decoration = m.map( Decoration::Backdrop ),
            NativeCall::Vibrancy( v ) => inner.decoration = v.map( Decoration::Vibrancy ),
            NativeCall::BackgroundColor( _ ) => {}
            NativeCall::Thumbar( buttons ) => inner.thumbar = buttons,
        }
        Ok(())
    }
}


impl NativeWindow for RecordingWindow {
    fn set_background_material( &self, material: Option<BackgroundMaterial> ) -> Result<(), NativeError> {
        self.record( NativeCall::BackgroundMaterial( material ) )
    }


    fn set_vibrancy( &self, vibrancy: Option<Vibrancy> ) -> Result<(), NativeError> {
        self.record( NativeCall::Vibrancy( vibrancy ) )
    }


    fn set_background_color( &self, color: Rgba ) -> Result<(), NativeError> {
        self.record( NativeCall::BackgroundColor( color ) )
    }


    fn set_thumbar_buttons( &self, buttons: &[TransportButton] ) -> Result<(), NativeError> {
        self.record( NativeCall::Thumbar( buttons.to_vec() ) )
    }
}


/// Playback controls that record invoked actions.
#[derive( Debug, Clone, Default )]
pub struct RecordingControls {
    actions: Rc<RefCell<Vec<TransportAction>>>,
}


impl RecordingControls {
    pub fn actions( &self ) -> Vec<TransportAction> {
        self.actions.borrow().clone()
    }
}


impl SongControls for RecordingControls {
    fn play_pause( &self ) {
        self.actions.borrow_mut().push( TransportAction::PlayPause );
    }


    fn next( &self ) {
        self.actions.borrow_mut().push( TransportAction::Next );
    }


    fn previous( &self ) {
        self.actions.borrow_mut().push( TransportAction::Previous );
    }
}


/// Icon provider serving small distinct images from memory.
#[derive( Debug, Default )]
pub struct StubIconProvider {
    images: HashMap<PathBuf, ImageHandle>,
    loads: Cell<usize>,
}


impl StubIconProvider {
    /// Serves all four default icons, each a different width.
    pub fn standard() -> Self {
        let paths = IconPaths::default();
        let mut images = HashMap::new();
        for ( i, kind ) in IconKind::ALL.into_iter().enumerate() {
            images.insert( paths.get( kind ).to_path_buf(), image_of_width( i as u32 + 1 ) );
        }
        Self { images, loads: Cell::new( 0 ) }
    }


    /// Removes one icon so loading it fails.
    pub fn without( mut self, kind: IconKind ) -> Self {
        self.images.remove( IconPaths::default().get( kind ) );
        self
    }


    pub fn loads( &self ) -> usize {
        self.loads.get()
    }
}


impl IconProvider for StubIconProvider {
    fn load_image( &self, path: &Path ) -> Option<ImageHandle> {
        self.loads.set( self.loads.get() + 1 );
        self.images.get( path ).cloned()
    }
}


pub fn image_of_width( width: u32 ) -> ImageHandle {
    ImageHandle::new( RgbaImage::from_pixel( width, 1, Pixel( [ 0, 0, 0, 255 ] ) ) )
}
