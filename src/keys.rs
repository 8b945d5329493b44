//! Key names, key specs and keycode lookup
//!
//! A key is named the way X names keysyms (`Return`, `F5`, `Shift_L`,
//! `comma`, ...) or by the single character it produces. The keysym is then
//! looked up in the keyboard mapping the server holds at call time, so a
//! resolved keycode is only good until the next remapping.

use crate::backend::DisplayBackend;
use crate::error::{Error, Result};

/// Server keyboard mapping as returned by GetKeyboardMapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardMapping {
    pub min_keycode: u8,
    pub keysyms_per_keycode: u8,
    /// `keysyms_per_keycode` entries per keycode, starting at `min_keycode`
    pub keysyms: Vec<u32>,
}

impl KeyboardMapping {
    /// Find a keycode producing `keysym`
    ///
    /// Unshifted columns are searched before shifted ones, lower keycodes
    /// before higher ones within a column.
    pub fn keycode_for(&self, keysym: u32) -> Option<u8> {
        let per = usize::from(self.keysyms_per_keycode);
        if per == 0 {
            return None;
        }

        (0..per).find_map(|column| {
            self.keysyms
                .chunks(per)
                .position(|syms| syms.get(column) == Some(&keysym))
                .and_then(|offset| u8::try_from(usize::from(self.min_keycode) + offset).ok())
        })
    }
}

/// Modifier accepted in a key spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Alt,
    Control,
    Shift,
}

impl Modifier {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "alt" => Some(Self::Alt),
            "control" => Some(Self::Control),
            "shift" => Some(Self::Shift),
            _ => None,
        }
    }

    /// Keysym name of the left-hand key for this modifier
    pub fn key_name(self) -> &'static str {
        match self {
            Self::Alt => "Alt_L",
            Self::Control => "Control_L",
            Self::Shift => "Shift_L",
        }
    }
}

/// A parsed key spec such as `control+shift+t`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySpec {
    /// Held for the whole sequence, in press order
    pub modifiers: Vec<Modifier>,
    /// Pressed and released in turn, in order
    pub primaries: Vec<String>,
}

/// Split a key spec on `+` into modifiers and primary keys
///
/// A spec without `+`, or a lone `+`, is a single literal key.
pub fn parse_key_spec(spec: &str) -> KeySpec {
    if !spec.contains('+') || spec == "+" {
        return KeySpec {
            modifiers: Vec::new(),
            primaries: vec![spec.to_string()],
        };
    }

    let mut parsed = KeySpec::default();
    for token in spec.split('+') {
        match Modifier::from_token(token) {
            Some(modifier) => parsed.modifiers.push(modifier),
            None => parsed.primaries.push(token.to_string()),
        }
    }
    parsed
}

/// Keycodes for a parsed spec, resolved against one mapping snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedKeySpec {
    pub modifiers: Vec<u8>,
    pub primaries: Vec<u8>,
}

/// Resolve every key of `spec` before anything is sent
pub fn resolve_key_spec<B: DisplayBackend + ?Sized>(backend: &B, spec: &KeySpec) -> Result<ResolvedKeySpec> {
    let mapping = backend.keyboard_mapping()?;
    let modifiers = spec
        .modifiers
        .iter()
        .map(|modifier| keycode_in(&mapping, modifier.key_name()))
        .collect::<Result<Vec<_>>>()?;
    let primaries = spec
        .primaries
        .iter()
        .map(|name| keycode_in(&mapping, name))
        .collect::<Result<Vec<_>>>()?;

    Ok(ResolvedKeySpec { modifiers, primaries })
}

/// Resolve a key name to a keycode under the current keyboard mapping
pub fn key_code<B: DisplayBackend + ?Sized>(backend: &B, name: &str) -> Result<u8> {
    let mapping = backend.keyboard_mapping()?;
    keycode_in(&mapping, name)
}

fn keycode_in(mapping: &KeyboardMapping, name: &str) -> Result<u8> {
    let keysym = keysym_from_name(name)?;
    mapping.keycode_for(keysym).ok_or_else(|| Error::UnmappedKey {
        name: name.to_string(),
        keysym,
    })
}

/// Resolve a key name to its keysym
///
/// Known names are the TTY, cursor, misc, keypad (`KP_*`), function
/// (`F1`..`F35`) and modifier keysyms plus the Latin-1 names from
/// `keysymdef.h` (`space`, `eacute`, `ssharp`, ...). Dead keys, XF86 media
/// keys and the non-Latin-1 script tables have no names here; a single
/// character still resolves to its Unicode keysym.
pub fn keysym_from_name(name: &str) -> Result<u32> {
    let name = match name {
        "Ctrl" => "Control_L",
        "Enter" => "Return",
        other => other,
    };

    if let Some(keysym) = named_keysym(name) {
        return Ok(keysym);
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let code = u32::from(c);
        match code {
            // Latin-1 keysyms equal their code points
            0x20..=0x7e | 0xa0..=0xff => return Ok(code),
            0x100.. => return Ok(0x0100_0000 | code),
            _ => {}
        }
    }

    Err(Error::InvalidKey(name.to_string()))
}

fn named_keysym(name: &str) -> Option<u32> {
    // Function keys F1..F35 are contiguous
    if let Some(n) = name.strip_prefix('F').and_then(|n| n.parse::<u32>().ok()) {
        return (1..=35).contains(&n).then(|| 0xffbe + n - 1);
    }
    if let Some(n) = name.strip_prefix("KP_").and_then(|n| n.parse::<u32>().ok()) {
        return (n <= 9).then_some(0xffb0 + n);
    }

    let keysym = match name {
        // TTY function keys
        "BackSpace" => 0xff08,
        "Tab" => 0xff09,
        "Linefeed" => 0xff0a,
        "Clear" => 0xff0b,
        "Return" => 0xff0d,
        "Pause" => 0xff13,
        "Scroll_Lock" => 0xff14,
        "Sys_Req" => 0xff15,
        "Escape" => 0xff1b,
        "Delete" => 0xffff,

        // Cursor control
        "Home" => 0xff50,
        "Left" => 0xff51,
        "Up" => 0xff52,
        "Right" => 0xff53,
        "Down" => 0xff54,
        "Prior" | "Page_Up" => 0xff55,
        "Next" | "Page_Down" => 0xff56,
        "End" => 0xff57,
        "Begin" => 0xff58,

        // Misc functions
        "Select" => 0xff60,
        "Print" => 0xff61,
        "Execute" => 0xff62,
        "Insert" => 0xff63,
        "Undo" => 0xff65,
        "Redo" => 0xff66,
        "Menu" => 0xff67,
        "Find" => 0xff68,
        "Cancel" => 0xff69,
        "Help" => 0xff6a,
        "Break" => 0xff6b,
        "Mode_switch" => 0xff7e,
        "Num_Lock" => 0xff7f,

        // Keypad
        "KP_Space" => 0xff80,
        "KP_Tab" => 0xff89,
        "KP_Enter" => 0xff8d,
        "KP_Home" => 0xff95,
        "KP_Left" => 0xff96,
        "KP_Up" => 0xff97,
        "KP_Right" => 0xff98,
        "KP_Down" => 0xff99,
        "KP_Prior" | "KP_Page_Up" => 0xff9a,
        "KP_Next" | "KP_Page_Down" => 0xff9b,
        "KP_End" => 0xff9c,
        "KP_Begin" => 0xff9d,
        "KP_Insert" => 0xff9e,
        "KP_Delete" => 0xff9f,
        "KP_Multiply" => 0xffaa,
        "KP_Add" => 0xffab,
        "KP_Separator" => 0xffac,
        "KP_Subtract" => 0xffad,
        "KP_Decimal" => 0xffae,
        "KP_Divide" => 0xffaf,
        "KP_Equal" => 0xffbd,

        // Modifiers
        "Shift_L" => 0xffe1,
        "Shift_R" => 0xffe2,
        "Control_L" => 0xffe3,
        "Control_R" => 0xffe4,
        "Caps_Lock" => 0xffe5,
        "Shift_Lock" => 0xffe6,
        "Meta_L" => 0xffe7,
        "Meta_R" => 0xffe8,
        "Alt_L" => 0xffe9,
        "Alt_R" => 0xffea,
        "Super_L" => 0xffeb,
        "Super_R" => 0xffec,
        "Hyper_L" => 0xffed,
        "Hyper_R" => 0xffee,
        "ISO_Level3_Shift" => 0xfe03,

        // Latin-1 punctuation
        "space" => 0x0020,
        "exclam" => 0x0021,
        "quotedbl" => 0x0022,
        "numbersign" => 0x0023,
        "dollar" => 0x0024,
        "percent" => 0x0025,
        "ampersand" => 0x0026,
        "apostrophe" => 0x0027,
        "parenleft" => 0x0028,
        "parenright" => 0x0029,
        "asterisk" => 0x002a,
        "plus" => 0x002b,
        "comma" => 0x002c,
        "minus" => 0x002d,
        "period" => 0x002e,
        "slash" => 0x002f,
        "colon" => 0x003a,
        "semicolon" => 0x003b,
        "less" => 0x003c,
        "equal" => 0x003d,
        "greater" => 0x003e,
        "question" => 0x003f,
        "at" => 0x0040,
        "bracketleft" => 0x005b,
        "backslash" => 0x005c,
        "bracketright" => 0x005d,
        "asciicircum" => 0x005e,
        "underscore" => 0x005f,
        "grave" => 0x0060,
        "braceleft" => 0x007b,
        "bar" => 0x007c,
        "braceright" => 0x007d,
        "asciitilde" => 0x007e,

        // Latin-1 supplement
        "nobreakspace" => 0x00a0,
        "exclamdown" => 0x00a1,
        "cent" => 0x00a2,
        "sterling" => 0x00a3,
        "currency" => 0x00a4,
        "yen" => 0x00a5,
        "brokenbar" => 0x00a6,
        "section" => 0x00a7,
        "diaeresis" => 0x00a8,
        "copyright" => 0x00a9,
        "ordfeminine" => 0x00aa,
        "guillemotleft" | "guillemetleft" => 0x00ab,
        "notsign" => 0x00ac,
        "hyphen" => 0x00ad,
        "registered" => 0x00ae,
        "macron" => 0x00af,
        "degree" => 0x00b0,
        "plusminus" => 0x00b1,
        "twosuperior" => 0x00b2,
        "threesuperior" => 0x00b3,
        "acute" => 0x00b4,
        "mu" => 0x00b5,
        "paragraph" => 0x00b6,
        "periodcentered" => 0x00b7,
        "cedilla" => 0x00b8,
        "onesuperior" => 0x00b9,
        "masculine" | "ordmasculine" => 0x00ba,
        "guillemotright" | "guillemetright" => 0x00bb,
        "onequarter" => 0x00bc,
        "onehalf" => 0x00bd,
        "threequarters" => 0x00be,
        "questiondown" => 0x00bf,
        "Agrave" => 0x00c0,
        "Aacute" => 0x00c1,
        "Acircumflex" => 0x00c2,
        "Atilde" => 0x00c3,
        "Adiaeresis" => 0x00c4,
        "Aring" => 0x00c5,
        "AE" => 0x00c6,
        "Ccedilla" => 0x00c7,
        "Egrave" => 0x00c8,
        "Eacute" => 0x00c9,
        "Ecircumflex" => 0x00ca,
        "Ediaeresis" => 0x00cb,
        "Igrave" => 0x00cc,
        "Iacute" => 0x00cd,
        "Icircumflex" => 0x00ce,
        "Idiaeresis" => 0x00cf,
        "ETH" | "Eth" => 0x00d0,
        "Ntilde" => 0x00d1,
        "Ograve" => 0x00d2,
        "Oacute" => 0x00d3,
        "Ocircumflex" => 0x00d4,
        "Otilde" => 0x00d5,
        "Odiaeresis" => 0x00d6,
        "multiply" => 0x00d7,
        "Oslash" | "Ooblique" => 0x00d8,
        "Ugrave" => 0x00d9,
        "Uacute" => 0x00da,
        "Ucircumflex" => 0x00db,
        "Udiaeresis" => 0x00dc,
        "Yacute" => 0x00dd,
        "THORN" | "Thorn" => 0x00de,
        "ssharp" => 0x00df,
        "agrave" => 0x00e0,
        "aacute" => 0x00e1,
        "acircumflex" => 0x00e2,
        "atilde" => 0x00e3,
        "adiaeresis" => 0x00e4,
        "aring" => 0x00e5,
        "ae" => 0x00e6,
        "ccedilla" => 0x00e7,
        "egrave" => 0x00e8,
        "eacute" => 0x00e9,
        "ecircumflex" => 0x00ea,
        "ediaeresis" => 0x00eb,
        "igrave" => 0x00ec,
        "iacute" => 0x00ed,
        "icircumflex" => 0x00ee,
        "idiaeresis" => 0x00ef,
        "eth" => 0x00f0,
        "ntilde" => 0x00f1,
        "ograve" => 0x00f2,
        "oacute" => 0x00f3,
        "ocircumflex" => 0x00f4,
        "otilde" => 0x00f5,
        "odiaeresis" => 0x00f6,
        "division" => 0x00f7,
        "oslash" | "ooblique" => 0x00f8,
        "ugrave" => 0x00f9,
        "uacute" => 0x00fa,
        "ucircumflex" => 0x00fb,
        "udiaeresis" => 0x00fc,
        "yacute" => 0x00fd,
        "thorn" => 0x00fe,
        "ydiaeresis" => 0x00ff,

        _ => return None,
    };
    Some(keysym)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeDisplay;

    #[test]
    fn test_parse_single_key() {
        let spec = parse_key_spec("Return");
        assert!(spec.modifiers.is_empty());
        assert_eq!(spec.primaries, vec!["Return"]);
    }

    #[test]
    fn test_parse_lone_plus_is_literal() {
        let spec = parse_key_spec("+");
        assert!(spec.modifiers.is_empty());
        assert_eq!(spec.primaries, vec!["+"]);
    }

    #[test]
    fn test_parse_modifiers_keep_order() {
        let spec = parse_key_spec("control+shift+t");
        assert_eq!(spec.modifiers, vec![Modifier::Control, Modifier::Shift]);
        assert_eq!(spec.primaries, vec!["t"]);
    }

    #[test]
    fn test_parse_multiple_primaries() {
        let spec = parse_key_spec("shift+j+l");
        assert_eq!(spec.modifiers, vec![Modifier::Shift]);
        assert_eq!(spec.primaries, vec!["j", "l"]);
    }

    #[test]
    fn test_parse_modifier_tokens_are_case_sensitive() {
        // Only the lowercase tokens are modifiers; anything else is a key name
        let spec = parse_key_spec("Shift_L+a");
        assert!(spec.modifiers.is_empty());
        assert_eq!(spec.primaries, vec!["Shift_L", "a"]);
    }

    #[test]
    fn test_keysym_names() {
        assert_eq!(keysym_from_name("Return").unwrap(), 0xff0d);
        assert_eq!(keysym_from_name("Enter").unwrap(), 0xff0d);
        assert_eq!(keysym_from_name("Ctrl").unwrap(), 0xffe3);
        assert_eq!(keysym_from_name("F1").unwrap(), 0xffbe);
        assert_eq!(keysym_from_name("F12").unwrap(), 0xffc9);
        assert_eq!(keysym_from_name("KP_7").unwrap(), 0xffb7);
        assert_eq!(keysym_from_name("Control_L").unwrap(), 0xffe3);
        assert_eq!(keysym_from_name("comma").unwrap(), 0x2c);
    }

    #[test]
    fn test_keysym_single_characters() {
        assert_eq!(keysym_from_name("a").unwrap(), 0x61);
        assert_eq!(keysym_from_name("A").unwrap(), 0x41);
        assert_eq!(keysym_from_name("+").unwrap(), 0x2b);
        assert_eq!(keysym_from_name("é").unwrap(), 0xe9);
        assert_eq!(keysym_from_name("€").unwrap(), 0x0100_20ac);
    }

    #[test]
    fn test_keysym_latin1_names() {
        assert_eq!(keysym_from_name("nobreakspace").unwrap(), 0xa0);
        assert_eq!(keysym_from_name("Agrave").unwrap(), 0xc0);
        assert_eq!(keysym_from_name("ssharp").unwrap(), 0xdf);
        assert_eq!(keysym_from_name("eacute").unwrap(), 0xe9);
        assert_eq!(keysym_from_name("ydiaeresis").unwrap(), 0xff);
        assert_eq!(keysym_from_name("guillemetleft").unwrap(), keysym_from_name("guillemotleft").unwrap());

        // Named and literal forms agree
        assert_eq!(keysym_from_name("eacute").unwrap(), keysym_from_name("é").unwrap());
        assert_eq!(keysym_from_name("Ntilde").unwrap(), keysym_from_name("Ñ").unwrap());
    }

    #[test]
    fn test_keysym_unsupported_families() {
        assert!(matches!(keysym_from_name("dead_acute"), Err(Error::InvalidKey(_))));
        assert!(matches!(keysym_from_name("XF86AudioPlay"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_unknown_key_names_the_key() {
        let err = keysym_from_name("NotAKey").unwrap_err();
        assert!(matches!(err, Error::InvalidKey(ref name) if name == "NotAKey"));
        assert!(err.to_string().contains("NotAKey"));

        assert!(matches!(keysym_from_name(""), Err(Error::InvalidKey(_))));
        assert!(matches!(keysym_from_name("F36"), Err(Error::InvalidKey(_))));
        assert!(matches!(keysym_from_name("\n"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_keycode_prefers_unshifted_column() {
        // keycode 10 carries '1' / '!', keycode 20 carries '!' unshifted
        let mut keysyms = vec![0; 22];
        keysyms[0] = 0x31;
        keysyms[1] = 0x21;
        keysyms[20] = 0x21;
        let mapping = KeyboardMapping {
            min_keycode: 10,
            keysyms_per_keycode: 2,
            keysyms,
        };
        assert_eq!(mapping.keycode_for(0x31), Some(10));
        assert_eq!(mapping.keycode_for(0x21), Some(20));
        assert_eq!(mapping.keycode_for(0x61), None);
    }

    #[test]
    fn test_empty_mapping_resolves_nothing() {
        assert_eq!(KeyboardMapping::default().keycode_for(0x61), None);
    }

    #[test]
    fn test_key_code_against_display() {
        let display = FakeDisplay::new();
        assert_eq!(key_code(&display, "a").unwrap(), FakeDisplay::KEY_A);
        assert_eq!(key_code(&display, "Ctrl_L").ok(), None);
        assert_eq!(key_code(&display, "Control_L").unwrap(), FakeDisplay::KEY_CONTROL);
    }

    #[test]
    fn test_unmapped_keysym() {
        let display = FakeDisplay::new();
        let err = key_code(&display, "F24").unwrap_err();
        assert!(matches!(err, Error::UnmappedKey { keysym: 0xffd5, .. }));
    }

    #[test]
    fn test_resolve_spec_fails_on_any_bad_key() {
        let display = FakeDisplay::new();
        let spec = parse_key_spec("shift+a+bogus");
        assert!(matches!(
            resolve_key_spec(&display, &spec),
            Err(Error::InvalidKey(name)) if name == "bogus"
        ));

        let spec = parse_key_spec("shift+a");
        let resolved = resolve_key_spec(&display, &spec).unwrap();
        assert_eq!(resolved.modifiers, vec![FakeDisplay::KEY_SHIFT]);
        assert_eq!(resolved.primaries, vec![FakeDisplay::KEY_A]);
    }
}
