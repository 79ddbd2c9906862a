//! Vitrine CLI - demo host for the window integrations
//!
//! Starts both integrations against a logging window, replays a short
//! playback session, walks the settings menu and shuts down.

mod cli;
mod log_window;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::Args;
use log_window::LogWindow;
use settings::Settings;

use vitrine_core::config::MaterialPatch;
use vitrine_core::menu::{ material_menu, KeyTranslator, MenuGroup, Translate };
use vitrine_core::{
    create_host_channel, create_transport_channel, material_options, ConfigStore,
    FileIconProvider, HostEvent, IconPaths, MaterialConfig, MemoryConfigStore, PlatformKind,
    PlaybackEventKind, PlaybackState, Session, TransportBinder, Visibility,
};


/// Installs the global tracing subscriber.
fn init_logging( verbose: u8 ) -> Result<()> {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level( level )
        .with_target( false )
        .finish();
    tracing::subscriber::set_global_default( subscriber )?;
    Ok(())
}


/// Applies command-line overrides on top of the persisted settings.
fn apply_overrides( settings: &mut Settings, args: &Args, platform: PlatformKind ) {
    let material = &mut settings.transparent_player;

    if let Some( kind ) = args.material {
        if !material_options( platform ).contains( &kind ) {
            tracing::warn!( "Material '{}' is not offered on {}; it will be skipped", kind, platform );
        }
        material.material = kind;
    }

    if let Some( opacity ) = args.opacity {
        if !( 0.0..=1.0 ).contains( &opacity ) {
            tracing::warn!( "Opacity {} is outside 0.0-1.0 and will be clamped", opacity );
        }
        material.opacity = opacity;
    }

    if args.enable {
        settings.transparent_player.enabled = true;
        settings.taskbar_media_control.enabled = true;
    }
}


/// Prints the catalogs and the settings menu for a platform.
fn print_catalogs( config: &MaterialConfig, platform: PlatformKind ) {
    let translator = KeyTranslator;

    println!( "Platform: {}", platform );
    let ids: Vec<String> = material_options( platform ).iter().map( |m| m.to_string() ).collect();
    println!( "Materials: {}", ids.join( ", " ) );

    for group in material_menu( config, platform ) {
        println!();
        println!( "{}", translator.translate( &group.label ) );
        for item in &group.items {
            let mark = if item.checked { "(*)" } else { "( )" };
            println!( "  {} {}", mark, translator.translate( &item.label ) );
        }
    }
}


/// Returns the patch of the item after the checked one, wrapping around.
fn next_patch( group: &MenuGroup ) -> Option<MaterialPatch> {
    let checked = group.items.iter().position( |i| i.checked );
    let next = checked.map_or( 0, |i| ( i + 1 ) % group.items.len() );
    group.items.get( next ).map( |i| i.patch )
}


/// Events of a short simulated listening session.
fn playback_script( title: &str, paused: bool ) -> Vec<HostEvent> {
    let state = |is_paused| PlaybackState::new( title, is_paused );

    vec![
        // Player loaded, nothing queued yet
        HostEvent::Playback { state: PlaybackState::default(), kind: PlaybackEventKind::TrackChanged },
        HostEvent::Playback { state: state( paused ), kind: PlaybackEventKind::TrackChanged },
        HostEvent::Playback { state: state( paused ), kind: PlaybackEventKind::TimeChanged },
        HostEvent::Visibility( Visibility::Hidden ),
        HostEvent::Visibility( Visibility::Shown ),
        HostEvent::TransportClicked( 1 ),
        HostEvent::Playback { state: state( !paused ), kind: PlaybackEventKind::PlayOrPaused },
    ]
}


#[tokio::main( flavor = "current_thread" )]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging( args.verbose )?;

    let platform = args.platform.unwrap_or_else( PlatformKind::current );
    let mut settings = Settings::load( args.config.as_deref() );
    apply_overrides( &mut settings, &args, platform );

    if args.list {
        print_catalogs( &settings.transparent_player, platform );
        return Ok(());
    }

    let material_store = MemoryConfigStore::new( settings.transparent_player.clone() );
    let transport_store = MemoryConfigStore::new( settings.taskbar_media_control.clone() );
    let mut material_changes = material_store.subscribe();

    let ( controls, actions ) = create_transport_channel();
    let paths = args.icons.as_deref().map( IconPaths::under ).unwrap_or_default();
    let binder = TransportBinder::new( controls, &FileIconProvider, &paths );

    let window = LogWindow::new();
    let mut session = Session::new( window.clone(), platform, binder );
    session.start( &material_store, &transport_store ).await;

    if !session.is_material_active() && !session.is_transport_active() {
        tracing::info!( "Nothing enabled for {} (use --enable)", platform );
    }

    let ( events, rx ) = create_host_channel();
    for event in playback_script( &args.title, args.paused ) {
        events.send( event )?;
    }
    session.pump( &rx );

    // Pick the next opacity and material from the menu, one change at a time
    for group in 0..2 {
        let menu = material_menu( &material_store.snapshot(), platform );
        let Some( patch ) = menu.get( group ).and_then( next_patch ) else {
            continue;
        };
        tracing::info!( "Menu selection: {:?}", patch );
        material_store.set_config( |c| patch.apply( c ) );

        if material_changes.has_changed()? {
            events.send( HostEvent::MaterialConfig( material_changes.borrow_and_update().clone() ) )?;
        }
        session.pump( &rx );
    }

    while let Ok( action ) = actions.try_recv() {
        tracing::info!( "[engine] {:?}", action );
    }

    events.send( HostEvent::Shutdown )?;
    session.pump( &rx );
    tracing::info!( "Session finished after {} native calls", window.calls() );

    if args.save {
        settings.transparent_player = material_store.snapshot();
        settings.save( args.config.as_deref() );
    }

    Ok(())
}


#[cfg( test )]
mod tests {
    use super::*;
    use vitrine_core::MaterialType;


    fn args( extra: &[&str] ) -> Args {
        let mut argv = vec![ "vitrine" ];
        argv.extend_from_slice( extra );
        Args::parse_from( argv )
    }


    #[test]
    fn test_overrides() {
        let mut settings = Settings::default();
        let args = args( &[ "--material", "mica", "--opacity", "0.8", "--enable" ] );
        apply_overrides( &mut settings, &args, PlatformKind::Windows );

        assert_eq!( settings.transparent_player.material, MaterialType::Mica );
        assert_eq!( settings.transparent_player.opacity, 0.8 );
        assert!( settings.taskbar_media_control.enabled );
    }


    #[test]
    fn test_platform_argument() {
        assert_eq!( args( &[ "--platform", "mac" ] ).platform, Some( PlatformKind::MacOS ) );
        assert!( Args::try_parse_from( [ "vitrine", "--material", "glass" ] ).is_err() );
    }


    #[test]
    fn test_next_patch_wraps() {
        let mut config = MaterialConfig::for_platform( PlatformKind::Windows );
        config.material = MaterialType::None;
        let menu = material_menu( &config, PlatformKind::Windows );
        assert_eq!( next_patch( &menu[ 1 ] ), Some( MaterialPatch::Material( MaterialType::Mica ) ) );
    }


    #[test]
    fn test_script_has_one_time_only_event() {
        let script = playback_script( "Song A", false );
        let time_only = script.iter()
            .filter( |e| matches!( e, HostEvent::Playback { kind: PlaybackEventKind::TimeChanged, .. } ) )
            .count();
        assert_eq!( time_only, 1 );
    }
}
