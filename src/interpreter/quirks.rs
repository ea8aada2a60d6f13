/// Switches for behaviour that differs between historical interpreters.
/// `Default` is the CHIP-48/SUPER-CHIP-era behaviour most ROMs expect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    /// FX55/FX65 leave `I = I + X + 1`, as the COSMAC VIP interpreter did.
    pub load_store_increments_index: bool,
}

impl Quirks {
    pub fn cosmac_vip() -> Quirks {
        Quirks {
            load_store_increments_index: true,
        }
    }
}
