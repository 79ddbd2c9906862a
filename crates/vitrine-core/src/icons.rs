//! Transport button icons
//!
//! Icons are loaded once per component. A missing or undecodable asset
//! becomes a blank image so surface construction never fails on it.

use std::fmt;
use std::path::{ Path, PathBuf };
use std::sync::Arc;

use image::RgbaImage;


const DEFAULT_ICON_DIR: &str = "assets/media-icons-black";


/// Logical icon keys used by the transport surface.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum IconKind {
    Play,
    Pause,
    Next,
    Previous,
}


impl IconKind {
    pub const ALL: [IconKind; 4] = [ IconKind::Play, IconKind::Pause, IconKind::Next, IconKind::Previous ];


    /// Parses an asset key (`"play"`, `"pause"`, `"next"`, `"previous"`).
    pub fn from_key( key: &str ) -> Option<Self> {
        match key {
            "play" => Some( IconKind::Play ),
            "pause" => Some( IconKind::Pause ),
            "next" => Some( IconKind::Next ),
            "previous" => Some( IconKind::Previous ),
            _ => None,
        }
    }


    pub fn key( &self ) -> &'static str {
        match self {
            IconKind::Play => "play",
            IconKind::Pause => "pause",
            IconKind::Next => "next",
            IconKind::Previous => "previous",
        }
    }
}


/// Shared decoded image. The empty handle is a blank image.
#[derive( Clone, Default, PartialEq )]
pub struct ImageHandle( Option<Arc<RgbaImage>> );


impl ImageHandle {
    pub fn new( image: RgbaImage ) -> Self {
        Self( Some( Arc::new( image ) ) )
    }


    pub fn empty() -> Self {
        Self( None )
    }


    pub fn is_empty( &self ) -> bool {
        self.0.is_none()
    }


    pub fn width( &self ) -> u32 {
        self.0.as_ref().map_or( 0, |img| img.width() )
    }


    pub fn height( &self ) -> u32 {
        self.0.as_ref().map_or( 0, |img| img.height() )
    }


    /// Returns the decoded pixels, or None for the blank image.
    pub fn image( &self ) -> Option<&RgbaImage> {
        self.0.as_deref()
    }
}


impl fmt::Debug for ImageHandle {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        match &self.0 {
            Some( img ) => write!( f, "ImageHandle({}x{})", img.width(), img.height() ),
            None => f.write_str( "ImageHandle(empty)" ),
        }
    }
}


/// Loads image assets from paths.
pub trait IconProvider {
    /// Returns None when the asset is absent or cannot be decoded.
    fn load_image( &self, path: &Path ) -> Option<ImageHandle>;
}


/// Decodes PNG icons from the filesystem.
#[derive( Debug, Default, Clone, Copy )]
pub struct FileIconProvider;


impl IconProvider for FileIconProvider {
    fn load_image( &self, path: &Path ) -> Option<ImageHandle> {
        match image::open( path ) {
            Ok( img ) => Some( ImageHandle::new( img.to_rgba8() ) ),
            Err( e ) => {
                tracing::debug!( "Icon {:?} unavailable: {}", path, e );
                None
            }
        }
    }
}


/// Static asset path for each icon.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct IconPaths {
    pub play: PathBuf,
    pub pause: PathBuf,
    pub next: PathBuf,
    pub previous: PathBuf,
}


impl Default for IconPaths {
    fn default() -> Self {
        Self::under( DEFAULT_ICON_DIR )
    }
}


impl IconPaths {
    /// Uses `<dir>/<key>.png` for every icon.
    pub fn under( dir: impl AsRef<Path> ) -> Self {
        let dir = dir.as_ref();
        Self {
            play: dir.join( "play.png" ),
            pause: dir.join( "pause.png" ),
            next: dir.join( "next.png" ),
            previous: dir.join( "previous.png" ),
        }
    }


    pub fn get( &self, kind: IconKind ) -> &Path {
        match kind {
            IconKind::Play => &self.play,
            IconKind::Pause => &self.pause,
            IconKind::Next => &self.next,
            IconKind::Previous => &self.previous,
        }
    }


    /// Returns the asset path for a key, or None for unknown keys.
    pub fn path_for_key( &self, key: &str ) -> Option<&Path> {
        IconKind::from_key( key ).map( |kind| self.get( kind ) )
    }
}


/// The four transport icons, loaded once.
#[derive( Debug, Clone, Default, PartialEq )]
pub struct IconSet {
    play: ImageHandle,
    pause: ImageHandle,
    next: ImageHandle,
    previous: ImageHandle,
}


impl IconSet {
    /// Loads every icon, substituting the blank image for any that fail.
    pub fn load( provider: &dyn IconProvider, paths: &IconPaths ) -> Self {
        let load = |kind: IconKind| {
            provider.load_image( paths.get( kind ) ).unwrap_or_else( || {
                tracing::warn!( "Missing '{}' icon at {:?}, using blank image", kind.key(), paths.get( kind ) );
                ImageHandle::empty()
            })
        };

        Self {
            play: load( IconKind::Play ),
            pause: load( IconKind::Pause ),
            next: load( IconKind::Next ),
            previous: load( IconKind::Previous ),
        }
    }


    pub fn get( &self, kind: IconKind ) -> &ImageHandle {
        match kind {
            IconKind::Play => &self.play,
            IconKind::Pause => &self.pause,
            IconKind::Next => &self.next,
            IconKind::Previous => &self.previous,
        }
    }


    /// Looks an icon up by asset key. Unknown keys resolve to the blank image.
    pub fn by_key( &self, key: &str ) -> ImageHandle {
        match IconKind::from_key( key ) {
            Some( kind ) => self.get( kind ).clone(),
            None => ImageHandle::empty(),
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::testing::StubIconProvider;


    #[test]
    fn test_icon_keys() {
        for kind in IconKind::ALL {
            assert_eq!( IconKind::from_key( kind.key() ), Some( kind ) );
        }
        assert_eq!( IconKind::from_key( "stop" ), None );
    }


    #[test]
    fn test_load_distinct_icons() {
        let provider = StubIconProvider::standard();
        let icons = IconSet::load( &provider, &IconPaths::default() );

        assert_eq!( provider.loads(), 4 );
        assert_eq!( icons.get( IconKind::Play ).width(), 1 );
        assert_eq!( icons.get( IconKind::Pause ).width(), 2 );
        assert_ne!( icons.get( IconKind::Play ), icons.get( IconKind::Pause ) );
    }


    #[test]
    fn test_missing_asset_is_blank() {
        let provider = StubIconProvider::standard().without( IconKind::Next );
        let icons = IconSet::load( &provider, &IconPaths::default() );

        assert!( icons.get( IconKind::Next ).is_empty() );
        assert!( !icons.get( IconKind::Previous ).is_empty() );
    }


    #[test]
    fn test_unknown_key_is_blank() {
        let icons = IconSet::load( &StubIconProvider::standard(), &IconPaths::default() );
        assert!( icons.by_key( "shuffle" ).is_empty() );
        assert_eq!( icons.by_key( "previous" ), *icons.get( IconKind::Previous ) );
        assert_eq!( IconPaths::default().path_for_key( "shuffle" ), None );
    }


    #[test]
    fn test_file_provider_missing_file() {
        let handle = FileIconProvider.load_image( Path::new( "does/not/exist/play.png" ) );
        assert!( handle.is_none() );
    }


    #[test]
    fn test_paths_under_dir() {
        let paths = IconPaths::under( "/opt/icons" );
        assert_eq!( paths.get( IconKind::Pause ), Path::new( "/opt/icons/pause.png" ) );
        assert_eq!( IconPaths::default().play, Path::new( "assets/media-icons-black/play.png" ) );
    }
}
