//! LaTeX to Unicode conversion for math spans
//!
//! Terminals cannot typeset, so math is approximated with Unicode: Greek
//! letters, operators, super/subscripts, `\frac` as a slash and `\sqrt` as a
//! radical. Anything unrecognized is passed through verbatim.

use std::iter::Peekable;
use std::str::Chars;

/// Deepest nesting of groups and command arguments that is converted;
/// anything below it is emitted verbatim
const MAX_DEPTH: usize = 64;

/// Convert a LaTeX math fragment (without delimiters) to plain Unicode text
pub fn to_unicode(latex: &str) -> String {
    let mut chars = latex.trim().chars().peekable();
    let out = convert(&mut chars, false, 0);
    collapse_spaces(&out)
}

fn convert(chars: &mut Peekable<Chars>, in_group: bool, depth: usize) -> String {
    if depth >= MAX_DEPTH {
        return chars.collect();
    }

    let mut out = String::new();

    while let Some(c) = chars.next() {
        match c {
            '}' if in_group => break,
            '{' => out.push_str(&convert(chars, true, depth + 1)),
            '\\' => out.push_str(&command(chars, depth + 1)),
            '^' => out.push_str(&script(chars, superscript, '^', depth + 1)),
            '_' => out.push_str(&script(chars, subscript, '_', depth + 1)),
            '~' => out.push(' '),
            _ => out.push(c),
        }
    }

    out
}

/// Read one argument: a braced group, a command, or a single character
fn argument(chars: &mut Peekable<Chars>, depth: usize) -> String {
    if depth >= MAX_DEPTH {
        return chars.collect();
    }
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
    match chars.next() {
        Some('{') => convert(chars, true, depth + 1),
        Some('\\') => command(chars, depth + 1),
        Some(c) => c.to_string(),
        None => String::new(),
    }
}

fn command(chars: &mut Peekable<Chars>, depth: usize) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }

    if name.is_empty() {
        // Control symbols: \, \; \! \{ \} \\ and friends
        return match chars.next() {
            Some(',') | Some(';') | Some(':') | Some(' ') => " ".to_string(),
            Some('!') => String::new(),
            Some('\\') => "\n".to_string(),
            Some(c) => c.to_string(),
            None => "\\".to_string(),
        };
    }

    match name.as_str() {
        "frac" | "dfrac" | "tfrac" => {
            let num = argument(chars, depth);
            let den = argument(chars, depth);
            format!("{}/{}", wrap_compound(&num), wrap_compound(&den))
        }
        "sqrt" => {
            let index = if chars.peek() == Some(&'[') {
                chars.next();
                let mut index = String::new();
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                    index.push(c);
                }
                index
            } else {
                String::new()
            };
            let radicand = argument(chars, depth);
            let radical = match index.trim() {
                "" => "√",
                "3" => "∛",
                "4" => "∜",
                other => {
                    let index = map_all(other, superscript).unwrap_or_default();
                    return format!("{}√{}", index, wrap_compound(&radicand));
                }
            };
            format!("{}{}", radical, wrap_compound(&radicand))
        }
        "text" | "mathrm" | "mathbf" | "mathit" | "mathsf" | "mathtt" | "operatorname" | "boldsymbol" => {
            argument(chars, depth)
        }
        "left" | "right" | "big" | "Big" | "bigg" | "Bigg" | "displaystyle" => {
            // `\left.` is an invisible delimiter
            if chars.peek() == Some(&'.') {
                chars.next();
            }
            String::new()
        }
        "quad" | "qquad" => " ".to_string(),
        _ => match symbol(&name) {
            Some(sym) => sym.to_string(),
            None => format!("\\{}", name),
        },
    }
}

fn script(
    chars: &mut Peekable<Chars>,
    map: fn(char) -> Option<char>,
    marker: char,
    depth: usize,
) -> String {
    let arg = argument(chars, depth);
    if arg.is_empty() {
        return marker.to_string();
    }
    match map_all(&arg, map) {
        Some(mapped) => mapped,
        None if arg.chars().count() == 1 => format!("{}{}", marker, arg),
        None => format!("{}({})", marker, arg),
    }
}

fn map_all(s: &str, map: fn(char) -> Option<char>) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    s.chars().map(map).collect()
}

fn wrap_compound(s: &str) -> String {
    let s = s.trim();
    if s.chars().count() <= 1 || s.chars().all(|c| c.is_alphanumeric()) {
        s.to_string()
    } else {
        format!("({})", s)
    }
}

fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_space = false;
    for c in s.chars() {
        if c == ' ' {
            if !last_space {
                out.push(c);
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' | '−' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'a' => 'ᵃ',
        'b' => 'ᵇ',
        'c' => 'ᶜ',
        'd' => 'ᵈ',
        'e' => 'ᵉ',
        'i' => 'ⁱ',
        'k' => 'ᵏ',
        'm' => 'ᵐ',
        'n' => 'ⁿ',
        'T' => 'ᵀ',
        'x' => 'ˣ',
        'y' => 'ʸ',
        '′' => '′',
        _ => return None,
    })
}

fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' | '−' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        't' => 'ₜ',
        'x' => 'ₓ',
        _ => return None,
    })
}

fn symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        // Greek
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" | "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" | "vartheta" => "θ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" | "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        // Operators
        "times" => "×",
        "cdot" => "·",
        "div" => "÷",
        "pm" => "±",
        "mp" => "∓",
        "ast" => "∗",
        "circ" => "∘",
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "iint" => "∬",
        "oint" => "∮",
        "partial" => "∂",
        "nabla" => "∇",
        "infty" => "∞",
        "cup" => "∪",
        "cap" => "∩",
        "wedge" | "land" => "∧",
        "vee" | "lor" => "∨",
        "neg" | "lnot" => "¬",
        "oplus" => "⊕",
        "otimes" => "⊗",
        // Relations
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "neq" | "ne" => "≠",
        "approx" => "≈",
        "equiv" => "≡",
        "sim" => "∼",
        "simeq" => "≃",
        "propto" => "∝",
        "in" => "∈",
        "notin" => "∉",
        "subset" => "⊂",
        "subseteq" => "⊆",
        "supset" => "⊃",
        "supseteq" => "⊇",
        "forall" => "∀",
        "exists" => "∃",
        "emptyset" | "varnothing" => "∅",
        "ll" => "≪",
        "gg" => "≫",
        "mid" => "∣",
        "parallel" => "∥",
        "perp" => "⊥",
        // Arrows
        "to" | "rightarrow" => "→",
        "leftarrow" | "gets" => "←",
        "leftrightarrow" => "↔",
        "Rightarrow" | "implies" => "⇒",
        "Leftarrow" => "⇐",
        "Leftrightarrow" | "iff" => "⇔",
        "mapsto" => "↦",
        // Misc
        "ldots" | "dots" => "…",
        "cdots" => "⋯",
        "vdots" => "⋮",
        "prime" => "′",
        "degree" => "°",
        "angle" => "∠",
        "hbar" => "ℏ",
        "ell" => "ℓ",
        "Re" => "ℜ",
        "Im" => "ℑ",
        "langle" => "⟨",
        "rangle" => "⟩",
        "lfloor" => "⌊",
        "rfloor" => "⌋",
        "lceil" => "⌈",
        "rceil" => "⌉",
        "sin" => "sin",
        "cos" => "cos",
        "tan" => "tan",
        "log" => "log",
        "ln" => "ln",
        "exp" => "exp",
        "lim" => "lim",
        "max" => "max",
        "min" => "min",
        _ => return None,
    })
}
