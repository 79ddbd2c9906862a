//! Window material types
//!
//! `MaterialType` is what the user picks; `BackgroundMaterial` and
//! `Vibrancy` are what the Windows and macOS native APIs accept.

use std::fmt;
use std::str::FromStr;

use serde::{ Deserialize, Serialize };
use thiserror::Error;


/// Error returned when a material id cannot be parsed.
#[derive( Debug, Error, PartialEq, Eq )]
#[error( "Unknown material type: '{0}'" )]
pub struct MaterialParseError( pub String );


/// User-selectable window material.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize )]
#[serde( rename_all = "kebab-case" )]
pub enum MaterialType {
    // Windows 11 system backdrops
    Mica,
    Acrylic,
    Tabbed,

    // macOS vibrancy materials
    Window,
    #[serde( rename = "fullscreen-ui" )]
    FullscreenUi,
    Content,
    UnderWindow,
    UnderPage,

    /// Undecorated window
    #[default]
    None,
}


/// Windows system backdrop kind.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum BackgroundMaterial {
    Mica,
    Acrylic,
    Tabbed,
}


/// macOS visual effect material.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Vibrancy {
    Window,
    FullscreenUi,
    Content,
    UnderWindow,
    UnderPage,
}


impl MaterialType {
    /// All material types, in declaration order.
    pub const ALL: [MaterialType; 9] = [
        MaterialType::Mica,
        MaterialType::Acrylic,
        MaterialType::Tabbed,
        MaterialType::Window,
        MaterialType::FullscreenUi,
        MaterialType::Content,
        MaterialType::UnderWindow,
        MaterialType::UnderPage,
        MaterialType::None,
    ];


    /// Returns the persisted string id.
    pub fn id( &self ) -> &'static str {
        match self {
            MaterialType::Mica => "mica",
            MaterialType::Acrylic => "acrylic",
            MaterialType::Tabbed => "tabbed",
            MaterialType::Window => "window",
            MaterialType::FullscreenUi => "fullscreen-ui",
            MaterialType::Content => "content",
            MaterialType::UnderWindow => "under-window",
            MaterialType::UnderPage => "under-page",
            MaterialType::None => "none",
        }
    }


    /// Returns the Windows backdrop for this material, if it belongs to that family.
    pub fn background_material( &self ) -> Option<BackgroundMaterial> {
        match self {
            MaterialType::Mica => Some( BackgroundMaterial::Mica ),
            MaterialType::Acrylic => Some( BackgroundMaterial::Acrylic ),
            MaterialType::Tabbed => Some( BackgroundMaterial::Tabbed ),
            _ => None,
        }
    }


    /// Returns the macOS vibrancy for this material, if it belongs to that family.
    pub fn vibrancy( &self ) -> Option<Vibrancy> {
        match self {
            MaterialType::Window => Some( Vibrancy::Window ),
            MaterialType::FullscreenUi => Some( Vibrancy::FullscreenUi ),
            MaterialType::Content => Some( Vibrancy::Content ),
            MaterialType::UnderWindow => Some( Vibrancy::UnderWindow ),
            MaterialType::UnderPage => Some( Vibrancy::UnderPage ),
            _ => None,
        }
    }
}


impl fmt::Display for MaterialType {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        f.write_str( self.id() )
    }
}


impl FromStr for MaterialType {
    type Err = MaterialParseError;


    fn from_str( s: &str ) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MaterialType::ALL
            .into_iter()
            .find( |m| m.id() == wanted )
            .ok_or_else( || MaterialParseError( s.to_string() ) )
    }
}


/// Background tint color. Alpha is in `[0.0, 1.0]`.
#[derive( Debug, Clone, Copy, PartialEq )]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}


impl Rgba {
    /// Black tint with the given opacity as alpha, clamped to range.
    pub fn tint( opacity: f32 ) -> Self {
        let a = if opacity.is_nan() { 0.0 } else { opacity.clamp( 0.0, 1.0 ) };
        Self { r: 0, g: 0, b: 0, a }
    }
}


impl fmt::Display for Rgba {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
        write!( f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a )
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_none_maps_to_no_native_kind() {
        assert_eq!( MaterialType::None.background_material(), None );
        assert_eq!( MaterialType::None.vibrancy(), None );
    }


    #[test]
    fn test_families_are_disjoint() {
        for material in MaterialType::ALL {
            assert!( !( material.background_material().is_some() && material.vibrancy().is_some() ) );
        }
        assert_eq!( MaterialType::Mica.background_material(), Some( BackgroundMaterial::Mica ) );
        assert_eq!( MaterialType::Mica.vibrancy(), None );
        assert_eq!( MaterialType::FullscreenUi.vibrancy(), Some( Vibrancy::FullscreenUi ) );
    }


    #[test]
    fn test_parse_ids() {
        assert_eq!( "fullscreen-ui".parse::<MaterialType>(), Ok( MaterialType::FullscreenUi ) );
        assert_eq!( " Mica ".parse::<MaterialType>(), Ok( MaterialType::Mica ) );
        assert!( "glass".parse::<MaterialType>().is_err() );
    }


    #[test]
    fn test_serde_ids_match_display() {
        for material in MaterialType::ALL {
            let json = serde_json::to_string( &material ).unwrap();
            assert_eq!( json, format!( "\"{}\"", material ) );
        }
    }


    #[test]
    fn test_tint_clamps() {
        assert_eq!( Rgba::tint( 1.5 ).a, 1.0 );
        assert_eq!( Rgba::tint( -0.2 ).a, 0.0 );
        assert_eq!( Rgba::tint( 0.5 ).to_string(), "rgba(0, 0, 0, 0.5)" );
    }
}
