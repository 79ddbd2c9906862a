//! Taskbar transport buttons
//!
//! The native thumbar API only supports replacing the whole button row,
//! so a `TransportButtonSet` is rebuilt from scratch on every change.

use std::sync::mpsc;

use crate::icons::{ IconKind, IconSet, ImageHandle };
use crate::playback::PlaybackState;


/// Actions a transport button can trigger.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum TransportAction {
    Previous,
    /// Toggles between playing and paused.
    PlayPause,
    Next,
}


/// Playback engine action triggers.
pub trait SongControls {
    fn play_pause( &self );
    fn next( &self );
    fn previous( &self );
}


impl TransportAction {
    /// Performs this action on the playback engine.
    pub fn invoke( self, controls: &dyn SongControls ) {
        match self {
            TransportAction::Previous => controls.previous(),
            TransportAction::PlayPause => controls.play_pause(),
            TransportAction::Next => controls.next(),
        }
    }
}


/// Forwards transport actions over a channel to the thread driving playback.
#[derive( Debug, Clone )]
pub struct ChannelControls {
    sender: mpsc::Sender<TransportAction>,
}


impl ChannelControls {
    pub fn new( sender: mpsc::Sender<TransportAction> ) -> Self {
        Self { sender }
    }


    fn send( &self, action: TransportAction ) {
        if self.sender.send( action ).is_err() {
            tracing::debug!( "Transport receiver gone, dropping {:?}", action );
        }
    }
}


impl SongControls for ChannelControls {
    fn play_pause( &self ) {
        self.send( TransportAction::PlayPause );
    }


    fn next( &self ) {
        self.send( TransportAction::Next );
    }


    fn previous( &self ) {
        self.send( TransportAction::Previous );
    }
}


/// Creates a channel for transport button actions.
pub fn create_transport_channel() -> ( ChannelControls, mpsc::Receiver<TransportAction> ) {
    let ( tx, rx ) = mpsc::channel();
    ( ChannelControls::new( tx ), rx )
}


/// One thumbar button.
#[derive( Debug, Clone, PartialEq )]
pub struct TransportButton {
    pub tooltip: &'static str,
    pub icon: ImageHandle,
    pub action: TransportAction,
}


/// The previous / play-pause / next button row.
#[derive( Debug, Clone, PartialEq )]
pub struct TransportButtonSet {
    buttons: [TransportButton; 3],
}


impl TransportButtonSet {
    /// Builds the row for the given playback state.
    ///
    /// The play-pause icon shows what a click will do: play while paused,
    /// pause while playing.
    pub fn build( state: &PlaybackState, icons: &IconSet ) -> Self {
        let toggle_icon = if state.is_paused { IconKind::Play } else { IconKind::Pause };

        Self {
            buttons: [
                TransportButton {
                    tooltip: "Previous",
                    icon: icons.get( IconKind::Previous ).clone(),
                    action: TransportAction::Previous,
                },
                TransportButton {
                    tooltip: "Play/Pause",
                    icon: icons.get( toggle_icon ).clone(),
                    action: TransportAction::PlayPause,
                },
                TransportButton {
                    tooltip: "Next",
                    icon: icons.get( IconKind::Next ).clone(),
                    action: TransportAction::Next,
                },
            ],
        }
    }


    pub fn buttons( &self ) -> &[TransportButton] {
        &self.buttons
    }


    pub fn play_pause( &self ) -> &TransportButton {
        &self.buttons[ 1 ]
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::icons::IconPaths;
    use crate::testing::{ RecordingControls, StubIconProvider };


    fn icons() -> IconSet {
        IconSet::load( &StubIconProvider::standard(), &IconPaths::default() )
    }


    #[test]
    fn test_button_order_and_actions() {
        let set = TransportButtonSet::build( &PlaybackState::new( "Song A", false ), &icons() );
        let actions: Vec<_> = set.buttons().iter().map( |b| b.action ).collect();
        assert_eq!( actions, vec![ TransportAction::Previous, TransportAction::PlayPause, TransportAction::Next ] );

        let tips: Vec<_> = set.buttons().iter().map( |b| b.tooltip ).collect();
        assert_eq!( tips, vec![ "Previous", "Play/Pause", "Next" ] );
    }


    #[test]
    fn test_toggle_icon_follows_paused() {
        let icons = icons();
        let playing = TransportButtonSet::build( &PlaybackState::new( "Song A", false ), &icons );
        let paused = TransportButtonSet::build( &PlaybackState::new( "Song A", true ), &icons );

        assert_eq!( playing.play_pause().icon, *icons.get( IconKind::Pause ) );
        assert_eq!( paused.play_pause().icon, *icons.get( IconKind::Play ) );
        assert_eq!( paused.play_pause().action, TransportAction::PlayPause );

        // Skip buttons never change
        assert_eq!( playing.buttons()[ 0 ], paused.buttons()[ 0 ] );
        assert_eq!( playing.buttons()[ 2 ], paused.buttons()[ 2 ] );
    }


    #[test]
    fn test_invoke_routes_to_controls() {
        let controls = RecordingControls::default();
        TransportAction::Next.invoke( &controls );
        TransportAction::PlayPause.invoke( &controls );
        TransportAction::Previous.invoke( &controls );
        assert_eq!( controls.actions(), vec![
            TransportAction::Next, TransportAction::PlayPause, TransportAction::Previous,
        ]);
    }


    #[test]
    fn test_channel_controls() {
        let ( controls, rx ) = create_transport_channel();
        controls.play_pause();
        controls.next();
        assert_eq!( rx.try_recv().ok(), Some( TransportAction::PlayPause ) );
        assert_eq!( rx.try_recv().ok(), Some( TransportAction::Next ) );

        drop( rx );
        // Sending after the receiver is gone must not panic
        controls.previous();
    }
}
