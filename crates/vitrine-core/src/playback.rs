//! Playback state as reported by the playback engine.


/// Snapshot of the current track. An empty title means no active track.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct PlaybackState {
    pub title: String,
    pub is_paused: bool,
}


impl PlaybackState {
    pub fn new( title: impl Into<String>, is_paused: bool ) -> Self {
        Self { title: title.into(), is_paused }
    }


    pub fn has_track( &self ) -> bool {
        !self.title.is_empty()
    }
}


/// Why the playback engine emitted a state notification.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum PlaybackEventKind {
    TrackChanged,
    PlayOrPaused,
    /// Elapsed position moved; nothing else changed.
    TimeChanged,
    MetadataChanged,
}


impl PlaybackEventKind {
    pub fn is_time_only( &self ) -> bool {
        matches!( self, PlaybackEventKind::TimeChanged )
    }
}
