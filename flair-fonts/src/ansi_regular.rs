//! `ansi-regular`: five rows of doubled `█` blocks.

use crate::FontData;

pub(crate) static FONT: FontData = FontData {
    height: 5,
    glyphs: &[
        (' ', &["     ", "     ", "     ", "     ", "     "]),
        ('!', &["██ ", "██ ", "██ ", "   ", "██ "]),
        ('"', &["██  ██ ", "██  ██ ", "       ", "       ", "       "]),
        ('#', &["  ██  ██   ", "██████████ ", "  ██  ██   ", "██████████ ", "  ██  ██   "]),
        ('$', &["  ████████ ", "██  ██     ", "  ██████   ", "    ██  ██ ", "████████   "]),
        ('%', &["██      ██ ", "      ██   ", "    ██     ", "  ██       ", "██      ██ "]),
        ('&', &["  ████     ", "██    ██   ", "  ████  ██ ", "██    ██   ", "  ████  ██ "]),
        ('\'', &["██ ", "██ ", "   ", "   ", "   "]),
        ('(', &["  ██ ", "██   ", "██   ", "██   ", "  ██ "]),
        (')', &["██   ", "  ██ ", "  ██ ", "  ██ ", "██   "]),
        ('*', &["           ", "██  ██  ██ ", "  ██████   ", "██  ██  ██ ", "           "]),
        ('+', &["       ", "  ██   ", "██████ ", "  ██   ", "       "]),
        (',', &["     ", "     ", "     ", "  ██ ", "██   "]),
        ('-', &["         ", "         ", "████████ ", "         ", "         "]),
        ('.', &["   ", "   ", "   ", "   ", "██ "]),
        ('/', &["        ██ ", "      ██   ", "    ██     ", "  ██       ", "██         "]),
        ('0', &["  ██████   ", "██    ████ ", "██  ██  ██ ", "████    ██ ", "  ██████   "]),
        ('1', &["  ██   ", "████   ", "  ██   ", "  ██   ", "██████ "]),
        ('2', &["  ██████   ", "██      ██ ", "    ████   ", "  ██       ", "██████████ "]),
        ('3', &["  ██████   ", "██      ██ ", "    ████   ", "██      ██ ", "  ██████   "]),
        ('4', &["██    ██   ", "██    ██   ", "██████████ ", "      ██   ", "      ██   "]),
        ('5', &["██████████ ", "██         ", "████████   ", "        ██ ", "████████   "]),
        ('6', &["  ██████   ", "██         ", "████████   ", "██      ██ ", "  ██████   "]),
        ('7', &["██████████ ", "      ██   ", "    ██     ", "  ██       ", "  ██       "]),
        ('8', &["  ██████   ", "██      ██ ", "  ██████   ", "██      ██ ", "  ██████   "]),
        ('9', &["  ██████   ", "██      ██ ", "  ████████ ", "      ██   ", "  ██████   "]),
        (':', &["   ", "██ ", "   ", "██ ", "   "]),
        (';', &["     ", "  ██ ", "     ", "  ██ ", "██   "]),
        ('<', &["    ██ ", "  ██   ", "██     ", "  ██   ", "    ██ "]),
        ('=', &["       ", "██████ ", "       ", "██████ ", "       "]),
        ('>', &["██     ", "  ██   ", "    ██ ", "  ██   ", "██     "]),
        ('?', &["  ██████   ", "██      ██ ", "    ████   ", "           ", "    ██     "]),
        ('@', &["  ██████   ", "██  ██████ ", "██  ██  ██ ", "██  ██████ ", "  ██████   "]),
        ('A', &["  ██████   ", "██      ██ ", "██████████ ", "██      ██ ", "██      ██ "]),
        ('B', &["████████   ", "██      ██ ", "████████   ", "██      ██ ", "████████   "]),
        ('C', &["  ██████   ", "██      ██ ", "██         ", "██      ██ ", "  ██████   "]),
        ('D', &["████████   ", "██      ██ ", "██      ██ ", "██      ██ ", "████████   "]),
        ('E', &["██████████ ", "██         ", "██████     ", "██         ", "██████████ "]),
        ('F', &["██████████ ", "██         ", "██████     ", "██         ", "██         "]),
        ('G', &["  ██████   ", "██         ", "██    ████ ", "██      ██ ", "  ██████   "]),
        ('H', &["██      ██ ", "██      ██ ", "██████████ ", "██      ██ ", "██      ██ "]),
        ('I', &["██████ ", "  ██   ", "  ██   ", "  ██   ", "██████ "]),
        ('J', &["    ██████ ", "      ██   ", "      ██   ", "██    ██   ", "  ████     "]),
        ('K', &["██      ██ ", "██    ██   ", "██████     ", "██    ██   ", "██      ██ "]),
        ('L', &["██         ", "██         ", "██         ", "██         ", "██████████ "]),
        ('M', &["██      ██ ", "████  ████ ", "██  ██  ██ ", "██      ██ ", "██      ██ "]),
        ('N', &["██      ██ ", "████    ██ ", "██  ██  ██ ", "██    ████ ", "██      ██ "]),
        ('O', &["  ██████   ", "██      ██ ", "██      ██ ", "██      ██ ", "  ██████   "]),
        ('P', &["████████   ", "██      ██ ", "████████   ", "██         ", "██         "]),
        ('Q', &["  ██████   ", "██      ██ ", "██  ██  ██ ", "██    ██   ", "  ████  ██ "]),
        ('R', &["████████   ", "██      ██ ", "████████   ", "██    ██   ", "██      ██ "]),
        ('S', &["  ████████ ", "██         ", "  ██████   ", "        ██ ", "████████   "]),
        ('T', &["██████████ ", "    ██     ", "    ██     ", "    ██     ", "    ██     "]),
        ('U', &["██      ██ ", "██      ██ ", "██      ██ ", "██      ██ ", "  ██████   "]),
        ('V', &["██      ██ ", "██      ██ ", "██      ██ ", "  ██  ██   ", "    ██     "]),
        ('W', &["██      ██ ", "██      ██ ", "██  ██  ██ ", "████  ████ ", "██      ██ "]),
        ('X', &["██      ██ ", "  ██  ██   ", "    ██     ", "  ██  ██   ", "██      ██ "]),
        ('Y', &["██      ██ ", "  ██  ██   ", "    ██     ", "    ██     ", "    ██     "]),
        ('Z', &["██████████ ", "      ██   ", "    ██     ", "  ██       ", "██████████ "]),
        ('[', &["████ ", "██   ", "██   ", "██   ", "████ "]),
        ('\\', &["██         ", "  ██       ", "    ██     ", "      ██   ", "        ██ "]),
        (']', &["████ ", "  ██ ", "  ██ ", "  ██ ", "████ "]),
        ('^', &["  ██   ", "██  ██ ", "       ", "       ", "       "]),
        ('_', &["         ", "         ", "         ", "         ", "████████ "]),
        ('|', &["██ ", "██ ", "██ ", "██ ", "██ "]),
        ('~', &["           ", "  ██       ", "██  ██  ██ ", "      ██   ", "           "]),
        ('a', &["  ██████   ", "██      ██ ", "██████████ ", "██      ██ ", "██      ██ "]),
        ('b', &["████████   ", "██      ██ ", "████████   ", "██      ██ ", "████████   "]),
        ('c', &["  ██████   ", "██      ██ ", "██         ", "██      ██ ", "  ██████   "]),
        ('d', &["████████   ", "██      ██ ", "██      ██ ", "██      ██ ", "████████   "]),
        ('e', &["██████████ ", "██         ", "██████     ", "██         ", "██████████ "]),
        ('f', &["██████████ ", "██         ", "██████     ", "██         ", "██         "]),
        ('g', &["  ██████   ", "██         ", "██    ████ ", "██      ██ ", "  ██████   "]),
        ('h', &["██      ██ ", "██      ██ ", "██████████ ", "██      ██ ", "██      ██ "]),
        ('i', &["██████ ", "  ██   ", "  ██   ", "  ██   ", "██████ "]),
        ('j', &["    ██████ ", "      ██   ", "      ██   ", "██    ██   ", "  ████     "]),
        ('k', &["██      ██ ", "██    ██   ", "██████     ", "██    ██   ", "██      ██ "]),
        ('l', &["██         ", "██         ", "██         ", "██         ", "██████████ "]),
        ('m', &["██      ██ ", "████  ████ ", "██  ██  ██ ", "██      ██ ", "██      ██ "]),
        ('n', &["██      ██ ", "████    ██ ", "██  ██  ██ ", "██    ████ ", "██      ██ "]),
        ('o', &["  ██████   ", "██      ██ ", "██      ██ ", "██      ██ ", "  ██████   "]),
        ('p', &["████████   ", "██      ██ ", "████████   ", "██         ", "██         "]),
        ('q', &["  ██████   ", "██      ██ ", "██  ██  ██ ", "██    ██   ", "  ████  ██ "]),
        ('r', &["████████   ", "██      ██ ", "████████   ", "██    ██   ", "██      ██ "]),
        ('s', &["  ████████ ", "██         ", "  ██████   ", "        ██ ", "████████   "]),
        ('t', &["██████████ ", "    ██     ", "    ██     ", "    ██     ", "    ██     "]),
        ('u', &["██      ██ ", "██      ██ ", "██      ██ ", "██      ██ ", "  ██████   "]),
        ('v', &["██      ██ ", "██      ██ ", "██      ██ ", "  ██  ██   ", "    ██     "]),
        ('w', &["██      ██ ", "██      ██ ", "██  ██  ██ ", "████  ████ ", "██      ██ "]),
        ('x', &["██      ██ ", "  ██  ██   ", "    ██     ", "  ██  ██   ", "██      ██ "]),
        ('y', &["██      ██ ", "  ██  ██   ", "    ██     ", "    ██     ", "    ██     "]),
        ('z', &["██████████ ", "      ██   ", "    ██     ", "  ██       ", "██████████ "]),
    ],
};
