//! Platform capability resolution
//!
//! Determines which native window effect family the running OS offers
//! and exposes the user-selectable catalogs for it.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;

use crate::material::MaterialType;


const WINDOWS_MATERIALS: &[MaterialType] = &[
    MaterialType::Mica,
    MaterialType::Acrylic,
    MaterialType::Tabbed,
    MaterialType::None,
];

const MACOS_MATERIALS: &[MaterialType] = &[
    MaterialType::Window,
    MaterialType::FullscreenUi,
    MaterialType::Content,
    MaterialType::UnderWindow,
    MaterialType::UnderPage,
    MaterialType::None,
];

const OTHER_MATERIALS: &[MaterialType] = &[ MaterialType::None ];

static CURRENT: OnceLock<PlatformKind> = OnceLock::new();


/// Error returned when a platform name cannot be parsed.
#[derive( Debug, Error, PartialEq, Eq )]
#[error( "Unknown platform: '{0}'. Use 'windows', 'macos', or 'other'" )]
pub struct PlatformParseError( pub String );


/// Operating system family, as far as window integrations are concerned.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum PlatformKind {
    Windows,
    MacOS,
    Other,
}


impl PlatformKind {
    /// Returns the platform of the running process.
    ///
    /// Resolved on first call and fixed for the lifetime of the process.
    pub fn current() -> Self {
        *CURRENT.get_or_init( || {
            let kind = Self::from_os_name( std::env::consts::OS );
            tracing::debug!( "Resolved platform {:?} from '{}'", kind, std::env::consts::OS );
            kind
        })
    }


    /// Maps an OS identity (as reported by `std::env::consts::OS`) to a platform kind.
    ///
    /// Unrecognized identities degrade to `Other`.
    pub fn from_os_name( os: &str ) -> Self {
        match os {
            "windows" => PlatformKind::Windows,
            "macos" => PlatformKind::MacOS,
            _ => PlatformKind::Other,
        }
    }


    /// Returns the name of the platform.
    pub fn name( &self ) -> &'static str {
        match self {
            PlatformKind::Windows => "windows",
            PlatformKind::MacOS => "macos",
            PlatformKind::Other => "other",
        }
    }
}


impl fmt::Display for PlatformKind {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.write_str( self.name() )
    }
}


impl FromStr for PlatformKind {
    type Err = PlatformParseError;


    fn from_str( s: &str ) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win" => Ok( PlatformKind::Windows ),
            "macos" | "mac" | "darwin" => Ok( PlatformKind::MacOS ),
            "other" | "linux" => Ok( PlatformKind::Other ),
            _ => Err( PlatformParseError( s.to_string() ) ),
        }
    }
}


/// Returns the ordered material catalog offered on the given platform.
pub fn material_options( kind: PlatformKind ) -> &'static [MaterialType] {
    match kind {
        PlatformKind::Windows => WINDOWS_MATERIALS,
        PlatformKind::MacOS => MACOS_MATERIALS,
        PlatformKind::Other => OTHER_MATERIALS,
    }
}


/// Returns the ordered opacity catalog (0.1 to 1.0 in steps of 0.1).
pub fn opacity_options() -> [f32; 10] {
    std::array::from_fn( |i| ( i + 1 ) as f32 / 10.0 )
}


/// Returns the material selected when no configuration exists yet.
pub fn default_material( kind: PlatformKind ) -> MaterialType {
    match kind {
        PlatformKind::Windows => MaterialType::Acrylic,
        PlatformKind::MacOS => MaterialType::FullscreenUi,
        PlatformKind::Other => MaterialType::None,
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_from_os_name() {
        assert_eq!( PlatformKind::from_os_name( "windows" ), PlatformKind::Windows );
        assert_eq!( PlatformKind::from_os_name( "macos" ), PlatformKind::MacOS );
        assert_eq!( PlatformKind::from_os_name( "linux" ), PlatformKind::Other );
        assert_eq!( PlatformKind::from_os_name( "haiku" ), PlatformKind::Other );
    }


    #[test]
    fn test_current_is_stable() {
        assert_eq!( PlatformKind::current(), PlatformKind::current() );
        assert_eq!( PlatformKind::current(), PlatformKind::from_os_name( std::env::consts::OS ) );
    }


    #[test]
    fn test_parse_aliases() {
        assert_eq!( "Win".parse::<PlatformKind>(), Ok( PlatformKind::Windows ) );
        assert_eq!( "darwin".parse::<PlatformKind>(), Ok( PlatformKind::MacOS ) );
        assert_eq!( "linux".parse::<PlatformKind>(), Ok( PlatformKind::Other ) );
        assert!( "beos".parse::<PlatformKind>().is_err() );
    }


    #[test]
    fn test_material_catalogs() {
        assert_eq!( material_options( PlatformKind::Windows ), &[
            MaterialType::Mica, MaterialType::Acrylic, MaterialType::Tabbed, MaterialType::None,
        ]);
        assert_eq!( material_options( PlatformKind::MacOS ).len(), 6 );
        assert_eq!( material_options( PlatformKind::MacOS )[ 1 ], MaterialType::FullscreenUi );
        assert_eq!( material_options( PlatformKind::Other ), &[ MaterialType::None ] );

        // Every catalog ends with the "clear" option
        for kind in [ PlatformKind::Windows, PlatformKind::MacOS, PlatformKind::Other ] {
            assert_eq!( material_options( kind ).last(), Some( &MaterialType::None ) );
        }
    }


    #[test]
    fn test_opacity_catalog() {
        let options = opacity_options();
        assert!( ( options[ 0 ] - 0.1 ).abs() < 1e-6 );
        assert!( ( options[ 4 ] - 0.5 ).abs() < 1e-6 );
        assert_eq!( options[ 9 ], 1.0 );
        assert!( options.windows( 2 ).all( |w| w[ 0 ] < w[ 1 ] ) );
    }


    #[test]
    fn test_default_material_is_in_catalog() {
        for kind in [ PlatformKind::Windows, PlatformKind::MacOS, PlatformKind::Other ] {
            assert!( material_options( kind ).contains( &default_material( kind ) ) );
        }
    }
}
