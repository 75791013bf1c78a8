//! LTDC register map
//!
//! Byte offsets of the controller registers relative to the peripheral base,
//! and the bit fields the driver touches. Layer registers are given relative
//! to a layer base ([`LAYER1_BASE`] / [`LAYER2_BASE`]).
//!
//! Most configuration registers are *shadow* registers: writes are staged and
//! only take effect once a reload is requested through [`SRCR`].
//!
//! ## Example
//!
//! ```
//! use ltdc::registers;
//!
//! // Absolute offset of the foreground layer's pixel format register
//! let pfcr = registers::LAYER2_BASE + registers::LAYER_PFCR;
//! assert_eq!(pfcr, 0x114);
//! ```

// Global registers

/// Synchronization size configuration register
pub const SSCR: u32 = 0x08;
/// Back porch configuration register
pub const BPCR: u32 = 0x0C;
/// Active width configuration register
pub const AWCR: u32 = 0x10;
/// Total width configuration register
pub const TWCR: u32 = 0x14;
/// Global control register
pub const GCR: u32 = 0x18;
/// Shadow reload configuration register
pub const SRCR: u32 = 0x24;
/// Background color configuration register
pub const BCCR: u32 = 0x2C;
/// Interrupt enable register
pub const IER: u32 = 0x34;
/// Interrupt status register
pub const ISR: u32 = 0x38;
/// Interrupt clear register (write 1 to clear)
pub const ICR: u32 = 0x3C;
/// Line interrupt position configuration register
pub const LIPCR: u32 = 0x40;
/// Current position status register
pub const CPSR: u32 = 0x44;

// Layer register blocks

/// Register block of layer 1 (background)
pub const LAYER1_BASE: u32 = 0x84;
/// Register block of layer 2 (foreground)
pub const LAYER2_BASE: u32 = 0x104;

/// Layer control register
pub const LAYER_CR: u32 = 0x00;
/// Layer window horizontal position configuration register
pub const LAYER_WHPCR: u32 = 0x04;
/// Layer window vertical position configuration register
pub const LAYER_WVPCR: u32 = 0x08;
/// Layer color keying configuration register
pub const LAYER_CKCR: u32 = 0x0C;
/// Layer pixel format configuration register
pub const LAYER_PFCR: u32 = 0x10;
/// Layer constant alpha configuration register
pub const LAYER_CACR: u32 = 0x14;
/// Layer default color configuration register
pub const LAYER_DCCR: u32 = 0x18;
/// Layer blending factors configuration register
pub const LAYER_BFCR: u32 = 0x1C;
/// Layer color frame buffer address register
pub const LAYER_CFBAR: u32 = 0x28;
/// Layer color frame buffer length register
pub const LAYER_CFBLR: u32 = 0x2C;
/// Layer color frame buffer line number register
pub const LAYER_CFBLNR: u32 = 0x30;
/// Layer CLUT write register
pub const LAYER_CLUTWR: u32 = 0x40;

// Timing window fields (SSCR, BPCR, AWCR, TWCR share the layout)

/// Horizontal field of the timing registers (bits 27:16)
pub const TIMING_H_MASK: u32 = 0x0FFF_0000;
/// Horizontal field position
pub const TIMING_H_SHIFT: u32 = 16;
/// Vertical field of the timing registers (bits 10:0)
pub const TIMING_V_MASK: u32 = 0x0000_07FF;

// GCR bits

/// Controller enable
pub const GCR_LTDCEN: u32 = 1 << 0;
/// Dither enable
pub const GCR_DEN: u32 = 1 << 16;
/// Pixel clock polarity
pub const GCR_PCPOL: u32 = 1 << 28;
/// Data enable polarity
pub const GCR_DEPOL: u32 = 1 << 29;
/// Vertical sync polarity
pub const GCR_VSPOL: u32 = 1 << 30;
/// Horizontal sync polarity
pub const GCR_HSPOL: u32 = 1 << 31;
/// All bits exposed through the global enable flags
pub const GCR_FLAGS_MASK: u32 =
    GCR_LTDCEN | GCR_DEN | GCR_PCPOL | GCR_DEPOL | GCR_VSPOL | GCR_HSPOL;

// SRCR bits

/// Immediate reload
pub const SRCR_IMR: u32 = 1 << 0;
/// Reload at the next vertical blanking period
pub const SRCR_VBR: u32 = 1 << 1;

// IER / ISR / ICR bits share positions

/// Line interrupt
pub const INT_LINE: u32 = 1 << 0;
/// FIFO underrun interrupt
pub const INT_FIFO_UNDERRUN: u32 = 1 << 1;
/// Transfer error interrupt
pub const INT_TRANSFER_ERROR: u32 = 1 << 2;
/// Register reload interrupt
pub const INT_RELOAD: u32 = 1 << 3;

/// 24-bit RGB field of BCCR, CKCR and CLUTWR
pub const RGB_MASK: u32 = 0x00FF_FFFF;
/// Line interrupt position field of LIPCR
pub const LIPCR_MASK: u32 = 0x7FF;
/// X field of CPSR (bits 31:16)
pub const CPSR_X_SHIFT: u32 = 16;
/// Y field of CPSR (bits 15:0)
pub const CPSR_Y_MASK: u32 = 0xFFFF;

// Layer CR bits

/// Layer enable
pub const LAYER_CR_LEN: u32 = 1 << 0;
/// Color keying enable
pub const LAYER_CR_COLKEN: u32 = 1 << 1;
/// Color look-up table enable
pub const LAYER_CR_CLUTEN: u32 = 1 << 4;
/// All bits exposed through the layer enable flags
pub const LAYER_CR_FLAGS_MASK: u32 = LAYER_CR_LEN | LAYER_CR_COLKEN | LAYER_CR_CLUTEN;

// Layer window fields

/// Window start field (horizontal 11:0, vertical 10:0)
pub const LAYER_WHPCR_START_MASK: u32 = 0x0000_0FFF;
/// Horizontal window stop field
pub const LAYER_WHPCR_STOP_MASK: u32 = 0x0FFF_0000;
/// Vertical window start field
pub const LAYER_WVPCR_START_MASK: u32 = 0x0000_07FF;
/// Vertical window stop field
pub const LAYER_WVPCR_STOP_MASK: u32 = 0x07FF_0000;
/// Window stop field position
pub const WINDOW_STOP_SHIFT: u32 = 16;

/// Pixel format field
pub const LAYER_PFCR_PF_MASK: u32 = 0x7;
/// Constant alpha field
pub const LAYER_CACR_CONSTA_MASK: u32 = 0xFF;

/// Blending factor 1 field (bits 10:8)
pub const LAYER_BFCR_BF1_MASK: u32 = 0x0700;
/// Blending factor 1 position
pub const LAYER_BFCR_BF1_SHIFT: u32 = 8;
/// Blending factor 2 field (bits 2:0)
pub const LAYER_BFCR_BF2_MASK: u32 = 0x0007;

/// Frame buffer pitch field of CFBLR
pub const LAYER_CFBLR_CFBP_MASK: u32 = 0x1FFF_0000;
/// Frame buffer pitch position
pub const LAYER_CFBLR_CFBP_SHIFT: u32 = 16;
/// Frame buffer line length field of CFBLR
pub const LAYER_CFBLR_CFBLL_MASK: u32 = 0x0000_1FFF;
/// Extra bytes the hardware expects on top of the line size
pub const LINE_LENGTH_PADDING: u32 = 3;
/// Frame buffer line number field
pub const LAYER_CFBLNR_MASK: u32 = 0x7FF;

/// Palette slot position in CLUTWR
pub const LAYER_CLUTWR_SLOT_SHIFT: u32 = 24;
