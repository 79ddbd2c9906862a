//! Native window backend for raw window handles
//!
//! Provides the real OS calls behind `NativeWindow` for any window that
//! exposes a `raw-window-handle`:
//! - Windows: system backdrops via `window-vibrancy`, thumbar via `ITaskbarList3`
//! - macOS: `NSVisualEffectView` vibrancy via `window-vibrancy`

use std::cell::RefCell;
use std::rc::Rc;

use raw_window_handle::HasWindowHandle;
use window_vibrancy::NSVisualEffectMaterial;

use crate::material::{ BackgroundMaterial, Rgba, Vibrancy };
use crate::native::{ NativeError, NativeWindow };
use crate::transport::TransportButton;


/// `WM_COMMAND` notification code sent when a thumbar button is clicked.
const THBN_CLICKED: usize = 0x1800;

/// Command id of the first thumbar button.
const BUTTON_ID_BASE: usize = 100;

const MAX_BUTTONS: usize = 7;


impl From<window_vibrancy::Error> for NativeError {
    fn from( e: window_vibrancy::Error ) -> Self {
        match e {
            window_vibrancy::Error::UnsupportedPlatform( msg )
            | window_vibrancy::Error::UnsupportedPlatformVersion( msg ) => NativeError::Unsupported( msg.to_string() ),
            other => NativeError::Failed( other.to_string() ),
        }
    }
}


fn ns_material( vibrancy: Vibrancy ) -> NSVisualEffectMaterial {
    match vibrancy {
        Vibrancy::Window => NSVisualEffectMaterial::WindowBackground,
        Vibrancy::FullscreenUi => NSVisualEffectMaterial::FullScreenUI,
        Vibrancy::Content => NSVisualEffectMaterial::ContentBackground,
        Vibrancy::UnderWindow => NSVisualEffectMaterial::UnderWindowBackground,
        Vibrancy::UnderPage => NSVisualEffectMaterial::UnderPageBackground,
    }
}


/// Decodes a `WM_COMMAND` wparam into the index of the clicked thumbar button.
///
/// Hosts forward this from their window procedure as `HostEvent::TransportClicked`.
pub fn thumbar_click( wparam: usize ) -> Option<usize> {
    let id = wparam & 0xffff;
    let notification = ( wparam >> 16 ) & 0xffff;
    if notification != THBN_CLICKED || !( BUTTON_ID_BASE..BUTTON_ID_BASE + MAX_BUTTONS ).contains( &id ) {
        return None;
    }
    Some( id - BUTTON_ID_BASE )
}


/// `NativeWindow` over a raw platform window handle.
///
/// Clones share the thumbar state of the same window.
#[derive( Clone )]
pub struct RawHandleWindow<H> {
    handle: H,
    #[cfg_attr( not( windows ), allow( dead_code ) )]
    thumbar: Rc<RefCell<thumbar::Thumbar>>,
}


impl<H: HasWindowHandle> RawHandleWindow<H> {
    pub fn new( handle: H ) -> Self {
        Self {
            handle,
            thumbar: Rc::new( RefCell::new( thumbar::Thumbar::default() ) ),
        }
    }


    pub fn handle( &self ) -> &H {
        &self.handle
    }
}


impl<H: HasWindowHandle> NativeWindow for RawHandleWindow<H> {
    fn set_background_material( &self, material: Option<BackgroundMaterial> ) -> Result<(), NativeError> {
        let window = &self.handle;

        // Only one backdrop may be active; clear the others first
        match material {
            None => {
                // Older builds lack some backdrops; clearing succeeds if any call does
                let results = [
                    window_vibrancy::clear_mica( window ),
                    window_vibrancy::clear_acrylic( window ),
                    window_vibrancy::clear_tabbed( window ),
                ];
                if !results.iter().any( Result::is_ok ) {
                    let [ first, .. ] = results;
                    first?;
                }
            }
            Some( BackgroundMaterial::Mica ) => {
                let _ = window_vibrancy::clear_acrylic( window );
                let _ = window_vibrancy::clear_tabbed( window );
                window_vibrancy::apply_mica( window, None )?;
            }
            Some( BackgroundMaterial::Acrylic ) => {
                let _ = window_vibrancy::clear_mica( window );
                let _ = window_vibrancy::clear_tabbed( window );
                window_vibrancy::apply_acrylic( window, None )?;
            }
            Some( BackgroundMaterial::Tabbed ) => {
                let _ = window_vibrancy::clear_mica( window );
                let _ = window_vibrancy::clear_acrylic( window );
                window_vibrancy::apply_tabbed( window, None )?;
            }
        }
        Ok(())
    }


    fn set_vibrancy( &self, vibrancy: Option<Vibrancy> ) -> Result<(), NativeError> {
        match vibrancy {
            Some( v ) => window_vibrancy::apply_vibrancy( &self.handle, ns_material( v ), None, None )?,
            None => {
                window_vibrancy::clear_vibrancy( &self.handle )?;
            }
        }
        Ok(())
    }


    fn set_background_color( &self, _color: Rgba ) -> Result<(), NativeError> {
        // The tint belongs to the host renderer (webview / surface clear color)
        Err( NativeError::Unsupported( "background tint is drawn by the host renderer".into() ) )
    }


    fn set_thumbar_buttons( &self, buttons: &[TransportButton] ) -> Result<(), NativeError> {
        #[cfg( windows )]
        {
            let hwnd = hwnd_of( &self.handle )?;
            self.thumbar.borrow_mut().install( hwnd, buttons )
        }

        #[cfg( not( windows ) )]
        {
            let _ = buttons;
            Err( NativeError::Unsupported( "thumbar buttons are only available on Windows".into() ) )
        }
    }
}


#[cfg( windows )]
fn hwnd_of( handle: &impl HasWindowHandle ) -> Result<windows::Win32::Foundation::HWND, NativeError> {
    use raw_window_handle::RawWindowHandle;

    let raw = handle.window_handle()
        .map_err( |e| NativeError::Failed( format!( "no window handle: {:?}", e ) ) )?;

    match raw.as_raw() {
        RawWindowHandle::Win32( win32 ) => {
            Ok( windows::Win32::Foundation::HWND( win32.hwnd.get() as *mut std::ffi::c_void ) )
        }
        _ => Err( NativeError::Unsupported( "not a Win32 window".into() ) ),
    }
}


#[cfg( windows )]
mod thumbar {
    use std::ffi::c_void;

    use windows::Win32::Foundation::{ HWND, TRUE };
    use windows::Win32::Graphics::Gdi::{ CreateBitmap, DeleteObject };
    use windows::Win32::System::Com::{ CoCreateInstance, CoInitializeEx, CLSCTX_INPROC_SERVER, COINIT_APARTMENTTHREADED };
    use windows::Win32::UI::Shell::{
        ITaskbarList3, TaskbarList, THUMBBUTTON, THUMBBUTTONFLAGS, THUMBBUTTONMASK,
        THBF_ENABLED, THBF_HIDDEN, THB_FLAGS, THB_ICON, THB_TOOLTIP,
    };
    use windows::Win32::UI::WindowsAndMessaging::{ CreateIconIndirect, DestroyIcon, HICON, ICONINFO };

    use super::{ BUTTON_ID_BASE, MAX_BUTTONS };
    use crate::icons::ImageHandle;
    use crate::native::NativeError;
    use crate::transport::TransportButton;


    /// Taskbar thumbnail toolbar of one window.
    ///
    /// Windows only allows adding buttons once per window, so later
    /// replacements update the existing row in place.
    #[derive( Default )]
    pub struct Thumbar {
        taskbar: Option<ITaskbarList3>,
        added: usize,
        icons: Vec<HICON>,
    }


    impl Thumbar {
        pub fn install( &mut self, hwnd: HWND, buttons: &[TransportButton] ) -> Result<(), NativeError> {
            let buttons = &buttons[ ..buttons.len().min( MAX_BUTTONS ) ];
            if buttons.is_empty() && self.added == 0 {
                return Ok(());
            }

            let taskbar = self.taskbar()?;
            let icons: Vec<HICON> = buttons.iter().map( |b| icon_from_image( &b.icon ) ).collect();

            // Hide any previously added button that is not part of the new row
            let slots = self.added.max( buttons.len() );
            let native: Vec<THUMBBUTTON> = ( 0..slots ).map( |i| match buttons.get( i ) {
                Some( button ) => thumb_button( i, icons[ i ], button.tooltip, THBF_ENABLED ),
                None => thumb_button( i, HICON::default(), "", THBF_HIDDEN ),
            }).collect();

            let result = unsafe {
                if self.added == 0 {
                    taskbar.ThumbBarAddButtons( hwnd, &native )
                } else {
                    taskbar.ThumbBarUpdateButtons( hwnd, &native )
                }
            };

            match result {
                Ok(()) => {
                    self.added = slots;
                    let previous = std::mem::replace( &mut self.icons, icons );
                    destroy_icons( &previous );
                    Ok(())
                }
                Err( e ) => {
                    destroy_icons( &icons );
                    Err( NativeError::Failed( format!( "thumbar update failed: {}", e ) ) )
                }
            }
        }


        fn taskbar( &mut self ) -> Result<ITaskbarList3, NativeError> {
            if let Some( taskbar ) = &self.taskbar {
                return Ok( taskbar.clone() );
            }

            let taskbar: ITaskbarList3 = unsafe {
                // Already initialized on the host's UI thread in the common case
                let _ = CoInitializeEx( None, COINIT_APARTMENTTHREADED );
                CoCreateInstance( &TaskbarList, None, CLSCTX_INPROC_SERVER )
                    .map_err( |e| NativeError::Unsupported( format!( "ITaskbarList3 unavailable: {}", e ) ) )?
            };
            unsafe { taskbar.HrInit() }
                .map_err( |e| NativeError::Failed( format!( "ITaskbarList3::HrInit failed: {}", e ) ) )?;

            self.taskbar = Some( taskbar.clone() );
            Ok( taskbar )
        }
    }


    impl Drop for Thumbar {
        fn drop( &mut self ) {
            destroy_icons( &self.icons );
        }
    }


    fn thumb_button( index: usize, icon: HICON, tooltip: &str, flags: THUMBBUTTONFLAGS ) -> THUMBBUTTON {
        let mut button = THUMBBUTTON {
            dwMask: THUMBBUTTONMASK( THB_ICON.0 | THB_TOOLTIP.0 | THB_FLAGS.0 ),
            iId: ( BUTTON_ID_BASE + index ) as u32,
            hIcon: icon,
            dwFlags: flags,
            ..Default::default()
        };

        let wide: Vec<u16> = tooltip.encode_utf16().take( button.szTip.len() - 1 ).collect();
        button.szTip[ ..wide.len() ].copy_from_slice( &wide );
        button
    }


    /// Converts an RGBA image into an `HICON`. Blank images give a null icon.
    fn icon_from_image( image: &ImageHandle ) -> HICON {
        let Some( rgba ) = image.image() else {
            return HICON::default();
        };

        // 32bpp GDI bitmaps are BGRA
        let bgra: Vec<u8> = rgba.pixels()
            .flat_map( |p| [ p.0[ 2 ], p.0[ 1 ], p.0[ 0 ], p.0[ 3 ] ] )
            .collect();
        let ( width, height ) = ( rgba.width() as i32, rgba.height() as i32 );

        unsafe {
            let color = CreateBitmap( width, height, 1, 32, Some( bgra.as_ptr() as *const c_void ) );
            let mask = CreateBitmap( width, height, 1, 1, None );

            let info = ICONINFO {
                fIcon: TRUE,
                xHotspot: 0,
                yHotspot: 0,
                hbmMask: mask,
                hbmColor: color,
            };
            let icon = CreateIconIndirect( &info ).unwrap_or_default();

            // The icon keeps its own copies of both bitmaps
            let _ = DeleteObject( color );
            let _ = DeleteObject( mask );
            icon
        }
    }


    fn destroy_icons( icons: &[HICON] ) {
        for icon in icons.iter().filter( |i| !i.is_invalid() ) {
            unsafe {
                let _ = DestroyIcon( *icon );
            }
        }
    }
}


#[cfg( not( windows ) )]
mod thumbar {
    /// No thumbnail toolbar outside Windows.
    #[derive( Default )]
    pub struct Thumbar;
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_thumbar_click_decoding() {
        assert_eq!( thumbar_click( ( THBN_CLICKED << 16 ) | 100 ), Some( 0 ) );
        assert_eq!( thumbar_click( ( THBN_CLICKED << 16 ) | 102 ), Some( 2 ) );
        // Menu command with the same id
        assert_eq!( thumbar_click( 101 ), None );
        assert_eq!( thumbar_click( ( THBN_CLICKED << 16 ) | 42 ), None );
    }


    #[test]
    fn test_vibrancy_errors_classified() {
        let gap: NativeError = window_vibrancy::Error::UnsupportedPlatformVersion( "needs Windows 11" ).into();
        assert!( matches!( gap, NativeError::Unsupported( _ ) ) );

        let platform: NativeError = window_vibrancy::Error::UnsupportedPlatform( "macOS only" ).into();
        assert!( matches!( platform, NativeError::Unsupported( _ ) ) );
    }


    #[cfg( target_os = "linux" )]
    #[test]
    fn test_linux_window_reports_capability_gaps() {
        use raw_window_handle::{ HandleError, RawWindowHandle, WindowHandle, XlibWindowHandle };

        struct XlibWindow;

        impl HasWindowHandle for XlibWindow {
            fn window_handle( &self ) -> Result<WindowHandle<'_>, HandleError> {
                let raw = RawWindowHandle::Xlib( XlibWindowHandle::new( 1 ) );
                // SAFETY: never dereferenced; every backend call rejects Xlib handles
                Ok( unsafe { WindowHandle::borrow_raw( raw ) } )
            }
        }

        let window = RawHandleWindow::new( XlibWindow );
        assert!( matches!( window.set_background_material( Some( BackgroundMaterial::Mica ) ), Err( NativeError::Unsupported( _ ) ) ) );
        assert!( matches!( window.set_background_material( None ), Err( NativeError::Unsupported( _ ) ) ) );
        assert!( matches!( window.set_vibrancy( Some( Vibrancy::Content ) ), Err( NativeError::Unsupported( _ ) ) ) );
        assert!( matches!( window.set_thumbar_buttons( &[] ), Err( NativeError::Unsupported( _ ) ) ) );
        assert!( matches!( window.set_background_color( Rgba::tint( 0.5 ) ), Err( NativeError::Unsupported( _ ) ) ) );
    }


    #[test]
    fn test_ns_material_mapping() {
        assert!( matches!( ns_material( Vibrancy::FullscreenUi ), NSVisualEffectMaterial::FullScreenUI ) );
        assert!( matches!( ns_material( Vibrancy::UnderPage ), NSVisualEffectMaterial::UnderPageBackground ) );
    }
}
