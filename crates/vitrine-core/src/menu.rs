//! Material settings menu model
//!
//! Radio groups for opacity and material type. Labels are translation
//! keys; the host's translation service renders them.

use crate::config::{ MaterialConfig, MaterialPatch };
use crate::platform::{ material_options, opacity_options, PlatformKind };


const OPACITY_EPSILON: f32 = 1e-6;


/// Translation key plus named arguments.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct MenuLabel {
    pub key: String,
    pub args: Vec<( &'static str, String )>,
}


impl MenuLabel {
    pub fn new( key: impl Into<String> ) -> Self {
        Self { key: key.into(), args: Vec::new() }
    }


    pub fn with_arg( mut self, name: &'static str, value: impl ToString ) -> Self {
        self.args.push(( name, value.to_string() ));
        self
    }
}


/// One radio item. Selecting it applies `patch` to the config.
#[derive( Debug, Clone, PartialEq )]
pub struct MenuItem {
    pub label: MenuLabel,
    pub checked: bool,
    pub patch: MaterialPatch,
}


#[derive( Debug, Clone, PartialEq )]
pub struct MenuGroup {
    pub label: MenuLabel,
    pub items: Vec<MenuItem>,
}


/// Renders menu labels to display text.
pub trait Translate {
    fn translate( &self, label: &MenuLabel ) -> String;
}


/// Fallback translator: prints the key followed by its arguments.
#[derive( Debug, Default, Clone, Copy )]
pub struct KeyTranslator;


impl Translate for KeyTranslator {
    fn translate( &self, label: &MenuLabel ) -> String {
        let mut text = label.key.clone();
        for ( name, value ) in &label.args {
            text.push_str( &format!( " {{{}={}}}", name, value ) );
        }
        text
    }
}


/// Builds the opacity and material type submenus for the current config.
pub fn material_menu( config: &MaterialConfig, platform: PlatformKind ) -> Vec<MenuGroup> {
    let opacity = MenuGroup {
        label: MenuLabel::new( "plugins.transparent-player.menu.opacity.label" ),
        items: opacity_options().into_iter().map( |value| MenuItem {
            label: MenuLabel::new( "plugins.transparent-player.menu.opacity.submenu.percent" )
                .with_arg( "opacity", ( value * 100.0 ).round() as u32 ),
            checked: ( config.opacity - value ).abs() < OPACITY_EPSILON,
            patch: MaterialPatch::Opacity( value ),
        }).collect(),
    };

    let material = MenuGroup {
        label: MenuLabel::new( "plugins.transparent-player.menu.type.label" ),
        items: material_options( platform ).iter().map( |&kind| MenuItem {
            label: MenuLabel::new( format!( "plugins.transparent-player.menu.type.submenu.{}", kind ) ),
            checked: config.material == kind,
            patch: MaterialPatch::Material( kind ),
        }).collect(),
    };

    vec![ opacity, material ]
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::material::MaterialType;


    #[test]
    fn test_opacity_group() {
        let config = MaterialConfig::for_platform( PlatformKind::Windows );
        let menu = material_menu( &config, PlatformKind::Windows );
        let opacity = &menu[ 0 ];

        assert_eq!( opacity.items.len(), 10 );
        assert_eq!( opacity.items[ 2 ].label.args, vec![ ( "opacity", "30".to_string() ) ] );

        let checked: Vec<_> = opacity.items.iter().filter( |i| i.checked ).collect();
        assert_eq!( checked.len(), 1 );
        assert_eq!( checked[ 0 ].patch, MaterialPatch::Opacity( opacity_options()[ 4 ] ) );
    }


    #[test]
    fn test_type_group_follows_platform() {
        let config = MaterialConfig::for_platform( PlatformKind::MacOS );
        let menu = material_menu( &config, PlatformKind::MacOS );
        let types = &menu[ 1 ];

        assert_eq!( types.items.len(), 6 );
        assert_eq!( types.items[ 1 ].label.key, "plugins.transparent-player.menu.type.submenu.fullscreen-ui" );
        assert!( types.items[ 1 ].checked );
        assert!( types.items.iter().filter( |i| i.checked ).count() == 1 );

        let other = material_menu( &MaterialConfig::for_platform( PlatformKind::Other ), PlatformKind::Other );
        assert_eq!( other[ 1 ].items.len(), 1 );
        assert_eq!( other[ 1 ].items[ 0 ].patch, MaterialPatch::Material( MaterialType::None ) );
    }


    #[test]
    fn test_selecting_item_patches_config() {
        let mut config = MaterialConfig::for_platform( PlatformKind::Windows );
        let menu = material_menu( &config, PlatformKind::Windows );
        menu[ 1 ].items[ 0 ].patch.apply( &mut config );
        assert_eq!( config.material, MaterialType::Mica );

        let menu = material_menu( &config, PlatformKind::Windows );
        assert!( menu[ 1 ].items[ 0 ].checked );
    }


    #[test]
    fn test_key_translator() {
        let label = MenuLabel::new( "menu.percent" ).with_arg( "opacity", 40 );
        assert_eq!( KeyTranslator.translate( &label ), "menu.percent {opacity=40}" );
    }
}
