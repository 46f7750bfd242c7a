//! CPU core: register file, interrupt handling, addressing-mode
//! resolution, and the instruction dispatcher.
//!
//! `step` runs exactly one unit of work: a pending NMI, a pending IRQ
//! (unless masked), or one instruction. Cycle accounting is table
//! driven; page-cross penalties are charged while the operand address
//! is resolved, branch penalties inside the branch handler.

use crate::bus::Bus;
use crate::cpu::flags::Flags;
use crate::cpu::opcodes::{AddressingMode, Mnemonic, Opcode, OPCODES};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

pub struct Cpu<B: Bus> {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Stack pointer, offset into page 0x01.
    pub sp: u8,
    pub pc: u16,
    pub flags: Flags,
    /// Level-style interrupt latches. NMI wins over IRQ; IRQ is masked
    /// by the interrupt-disable flag. Cleared when servicing begins.
    pub irq_pending: bool,
    pub nmi_pending: bool,
    /// Total CPU cycles since power-on; drives the PPU clock and the
    /// trace output.
    pub cycles: u64,
    /// Set by JAM; a halted CPU ignores further steps.
    pub halted: bool,
    pub bus: B,
}

impl<B: Bus> Cpu<B> {
    pub fn new(bus: B) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            flags: Flags::default(),
            irq_pending: false,
            nmi_pending: false,
            cycles: 0,
            halted: false,
            bus,
        }
    }

    /// Handle the reset signal: the stack pointer and interrupt mask
    /// get their power-on values and execution restarts at the reset
    /// vector. Costs 7 cycles like the real interrupt sequence.
    pub fn reset(&mut self) {
        self.sp = 0xFD;
        self.flags.interrupt_disable = true;
        self.pc = self.read16(RESET_VECTOR);
        self.cycles += 7;
    }

    /// Service one pending interrupt if applicable, otherwise execute
    /// the instruction under the program counter.
    pub fn step(&mut self) {
        if self.halted {
            return;
        }
        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(NMI_VECTOR);
        } else if self.irq_pending && !self.flags.interrupt_disable {
            self.irq_pending = false;
            self.interrupt(IRQ_VECTOR);
        } else {
            self.fetch_exec();
        }
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        self.bus.read(addr)
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        self.bus.write(addr, data)
    }

    /// Two successive reads assembled little-endian. No page-wrap
    /// quirk here; that belongs to indirect addressing only.
    pub fn read16(&mut self, addr: u16) -> u16 {
        let lo = u16::from(self.read(addr));
        let hi = u16::from(self.read(addr.wrapping_add(1)));
        hi << 8 | lo
    }

    pub fn write16(&mut self, addr: u16, data: u16) {
        self.write(addr, (data & 0xFF) as u8);
        self.write(addr.wrapping_add(1), (data >> 8) as u8);
    }

    /// Resolve the operand's effective address. PC must sit on the
    /// first operand byte. Charges the page-cross penalty cycle for
    /// descriptors that carry the flag.
    fn operand_addr(&mut self, opcode: &Opcode) -> u16 {
        match opcode.mode {
            AddressingMode::Implied => unreachable!("implied mode has no operand"),
            AddressingMode::Immediate => self.pc,
            AddressingMode::Zeropage => u16::from(self.read(self.pc)),
            AddressingMode::ZeropageX => u16::from(self.read(self.pc).wrapping_add(self.x)),
            AddressingMode::ZeropageY => u16::from(self.read(self.pc).wrapping_add(self.y)),
            AddressingMode::Absolute => self.read16(self.pc),
            AddressingMode::AbsoluteX => {
                let base = self.read16(self.pc);
                let addr = base.wrapping_add(u16::from(self.x));
                self.charge_page_cross(opcode, base, addr);
                addr
            }
            AddressingMode::AbsoluteY => {
                let base = self.read16(self.pc);
                let addr = base.wrapping_add(u16::from(self.y));
                self.charge_page_cross(opcode, base, addr);
                addr
            }
            AddressingMode::Relative => {
                let offset = self.read(self.pc) as i8;
                self.pc.wrapping_add(1).wrapping_add(offset as u16)
            }
            AddressingMode::Indirect => {
                let reference = self.read16(self.pc);
                let lo = u16::from(self.read(reference));
                // The 6502 fetches the high byte from the start of the
                // same page when the pointer sits on a page boundary.
                let hi = if reference & 0xFF == 0xFF {
                    u16::from(self.read(reference & 0xFF00))
                } else {
                    u16::from(self.read(reference.wrapping_add(1)))
                };
                hi << 8 | lo
            }
            AddressingMode::IndirectX => {
                let reference = self.read(self.pc).wrapping_add(self.x);
                let lo = u16::from(self.read(u16::from(reference)));
                let hi = u16::from(self.read(u16::from(reference.wrapping_add(1))));
                hi << 8 | lo
            }
            AddressingMode::IndirectY => {
                let reference = self.read(self.pc);
                let lo = u16::from(self.read(u16::from(reference)));
                let hi = u16::from(self.read(u16::from(reference.wrapping_add(1))));
                let base = hi << 8 | lo;
                let addr = base.wrapping_add(u16::from(self.y));
                self.charge_page_cross(opcode, base, addr);
                addr
            }
        }
    }

    fn charge_page_cross(&mut self, opcode: &Opcode, base: u16, addr: u16) {
        if opcode.adds_cycle_on_page_cross() && addr & 0xFF00 != base & 0xFF00 {
            self.cycles += 1;
        }
    }

    fn stack_push(&mut self, val: u8) {
        self.write(0x0100 | u16::from(self.sp), val);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn stack_pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.read(0x0100 | u16::from(self.sp))
    }

    fn stack_push16(&mut self, data: u16) {
        self.stack_push((data >> 8) as u8);
        self.stack_push((data & 0xFF) as u8);
    }

    fn stack_pop16(&mut self) -> u16 {
        let lo = u16::from(self.stack_pop());
        let hi = u16::from(self.stack_pop());
        hi << 8 | lo
    }

    fn update_zero_neg(&mut self, val: u8) {
        self.flags.zero = val == 0;
        self.flags.negative = val & 0x80 != 0;
    }

    /// Fetch, decode, and execute the instruction under PC.
    ///
    /// PC is advanced past the opcode byte before the handler runs.
    /// Handlers that transfer control set PC themselves; for everyone
    /// else PC advances by the remaining instruction length afterward.
    fn fetch_exec(&mut self) {
        let code = self.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let opcode = &OPCODES[code as usize];

        let addr = if opcode.mode != AddressingMode::Implied {
            self.operand_addr(opcode)
        } else {
            0
        };
        let prev_pc = self.pc;

        use crate::cpu::opcodes::AddressingMode::Implied;
        use crate::cpu::opcodes::Mnemonic as M;
        match opcode.mnemonic {
            // Transfers
            M::LDA => self.lda(addr),
            M::LDX => self.ldx(addr),
            M::LDY => self.ldy(addr),
            M::STA => self.sta(addr),
            M::STX => self.stx(addr),
            M::STY => self.sty(addr),
            M::TAX => {
                self.x = self.a;
                self.update_zero_neg(self.x);
            }
            M::TAY => {
                self.y = self.a;
                self.update_zero_neg(self.y);
            }
            M::TSX => {
                self.x = self.sp;
                self.update_zero_neg(self.x);
            }
            M::TXA => {
                self.a = self.x;
                self.update_zero_neg(self.a);
            }
            M::TYA => {
                self.a = self.y;
                self.update_zero_neg(self.a);
            }
            M::TXS => self.sp = self.x,

            // Stack
            M::PHA => {
                let a = self.a;
                self.stack_push(a);
            }
            M::PHP => self.php(),
            M::PLA => {
                self.a = self.stack_pop();
                self.update_zero_neg(self.a);
            }
            M::PLP => {
                let bits = self.stack_pop();
                self.flags.set_bits(bits);
            }

            // Decrements and increments
            M::DEC => self.dec(addr),
            M::DEX => {
                self.x = self.x.wrapping_sub(1);
                self.update_zero_neg(self.x);
            }
            M::DEY => {
                self.y = self.y.wrapping_sub(1);
                self.update_zero_neg(self.y);
            }
            M::INC => self.inc(addr),
            M::INX => {
                self.x = self.x.wrapping_add(1);
                self.update_zero_neg(self.x);
            }
            M::INY => {
                self.y = self.y.wrapping_add(1);
                self.update_zero_neg(self.y);
            }

            // Arithmetic
            M::ADC => self.adc(addr),
            M::SBC => self.sbc(addr),

            // Logical
            M::AND => self.and(addr),
            M::EOR => self.eor(addr),
            M::ORA => self.ora(addr),

            // Shifts and rotates; the accumulator forms use Implied.
            M::ASL => {
                if opcode.mode == Implied {
                    self.asl_a()
                } else {
                    self.asl_mem(addr);
                }
            }
            M::LSR => {
                if opcode.mode == Implied {
                    self.lsr_a()
                } else {
                    self.lsr_mem(addr);
                }
            }
            M::ROL => {
                if opcode.mode == Implied {
                    self.rol_a()
                } else {
                    self.rol_mem(addr);
                }
            }
            M::ROR => {
                if opcode.mode == Implied {
                    self.ror_a()
                } else {
                    self.ror_mem(addr);
                }
            }

            // Flag operations
            M::CLC => self.flags.carry = false,
            M::CLD => self.flags.decimal = false,
            M::CLI => self.flags.interrupt_disable = false,
            M::CLV => self.flags.overflow = false,
            M::SEC => self.flags.carry = true,
            M::SED => self.flags.decimal = true,
            M::SEI => self.flags.interrupt_disable = true,

            // Comparisons
            M::CMP => {
                let a = self.a;
                self.compare_with(addr, a);
            }
            M::CPX => {
                let x = self.x;
                self.compare_with(addr, x);
            }
            M::CPY => {
                let y = self.y;
                self.compare_with(addr, y);
            }

            // Conditional branches
            M::BCC => self.branch_cond(!self.flags.carry),
            M::BCS => self.branch_cond(self.flags.carry),
            M::BEQ => self.branch_cond(self.flags.zero),
            M::BMI => self.branch_cond(self.flags.negative),
            M::BNE => self.branch_cond(!self.flags.zero),
            M::BPL => self.branch_cond(!self.flags.negative),
            M::BVC => self.branch_cond(!self.flags.overflow),
            M::BVS => self.branch_cond(self.flags.overflow),

            // Jumps and subroutines
            M::JMP => self.pc = addr,
            M::JSR => {
                let ret = self.pc.wrapping_add(1);
                self.stack_push16(ret);
                self.pc = addr;
            }
            M::RTS => self.pc = self.stack_pop16().wrapping_add(1),

            // Interrupts
            M::BRK => self.brk(),
            M::RTI => {
                let bits = self.stack_pop();
                self.flags.set_bits(bits);
                self.pc = self.stack_pop16();
            }

            // Other
            M::BIT => self.bit(addr),
            M::NOP => {}

            // Undocumented composites
            M::DCP => {
                self.dec(addr);
                let a = self.a;
                self.compare_with(addr, a);
            }
            M::ISB => {
                self.inc(addr);
                self.sbc(addr);
            }
            M::LAX => self.lax(addr),
            M::RLA => {
                self.rol_mem(addr);
                self.and(addr);
            }
            M::RRA => {
                self.ror_mem(addr);
                self.adc(addr);
            }
            M::SAX => {
                let data = self.a & self.x;
                self.write(addr, data);
            }
            M::SLO => {
                self.asl_mem(addr);
                self.ora(addr);
            }
            M::SRE => {
                self.lsr_mem(addr);
                self.eor(addr);
            }
            M::USBC => self.sbc(addr),

            // JAM wedges the CPU until reset.
            M::JAM => self.halted = true,

            // Unstable opcodes: operand bytes and cycles are consumed,
            // results are not modeled.
            M::ANC | M::ALR | M::ARR | M::ANE | M::LXA | M::SBX | M::LAS | M::TAS | M::SHA
            | M::SHX | M::SHY => {}
        }

        // Don't advance PC if the instruction set it (jumps, branches).
        if self.pc == prev_pc {
            self.pc = self.pc.wrapping_add(u16::from(opcode.len) - 1);
        }
        self.cycles += u64::from(opcode.cycles);
    }

    fn lda(&mut self, addr: u16) {
        self.a = self.read(addr);
        self.update_zero_neg(self.a);
    }

    fn ldx(&mut self, addr: u16) {
        self.x = self.read(addr);
        self.update_zero_neg(self.x);
    }

    fn ldy(&mut self, addr: u16) {
        self.y = self.read(addr);
        self.update_zero_neg(self.y);
    }

    fn sta(&mut self, addr: u16) {
        let a = self.a;
        self.write(addr, a);
    }

    fn stx(&mut self, addr: u16) {
        let x = self.x;
        self.write(addr, x);
    }

    fn sty(&mut self, addr: u16) {
        let y = self.y;
        self.write(addr, y);
    }

    fn adc_value(&mut self, data: u8) {
        let sum = u16::from(self.a) + u16::from(data) + u16::from(self.flags.carry);
        self.flags.carry = sum > 0xFF;
        let result = sum as u8;
        self.flags.overflow = (data ^ result) & (result ^ self.a) & 0x80 != 0;
        self.a = result;
        self.update_zero_neg(self.a);
    }

    fn adc(&mut self, addr: u16) {
        let data = self.read(addr);
        self.adc_value(data);
    }

    // SBC is ADC of the one's complement: the borrow is applied by a
    // *clear* carry flag.
    fn sbc(&mut self, addr: u16) {
        let data = self.read(addr);
        self.adc_value(!data);
    }

    fn and(&mut self, addr: u16) {
        self.a &= self.read(addr);
        self.update_zero_neg(self.a);
    }

    fn eor(&mut self, addr: u16) {
        self.a ^= self.read(addr);
        self.update_zero_neg(self.a);
    }

    fn ora(&mut self, addr: u16) {
        self.a |= self.read(addr);
        self.update_zero_neg(self.a);
    }

    fn asl_a(&mut self) {
        self.flags.carry = self.a & 0x80 != 0;
        self.a <<= 1;
        self.update_zero_neg(self.a);
    }

    fn asl_mem(&mut self, addr: u16) {
        let data = self.read(addr);
        self.flags.carry = data & 0x80 != 0;
        let result = data << 1;
        self.write(addr, result);
        self.update_zero_neg(result);
    }

    fn lsr_a(&mut self) {
        self.flags.carry = self.a & 1 != 0;
        self.a >>= 1;
        self.update_zero_neg(self.a);
    }

    fn lsr_mem(&mut self, addr: u16) {
        let data = self.read(addr);
        self.flags.carry = data & 1 != 0;
        let result = data >> 1;
        self.write(addr, result);
        self.update_zero_neg(result);
    }

    fn rol_a(&mut self) {
        let carry_out = self.a & 0x80 != 0;
        self.a = self.a << 1 | self.flags.carry as u8;
        self.update_zero_neg(self.a);
        self.flags.carry = carry_out;
    }

    fn rol_mem(&mut self, addr: u16) {
        let data = self.read(addr);
        let carry_out = data & 0x80 != 0;
        let result = data << 1 | self.flags.carry as u8;
        self.write(addr, result);
        self.update_zero_neg(result);
        self.flags.carry = carry_out;
    }

    fn ror_a(&mut self) {
        let carry_out = self.a & 1 != 0;
        self.a = self.a >> 1 | (self.flags.carry as u8) << 7;
        self.update_zero_neg(self.a);
        self.flags.carry = carry_out;
    }

    fn ror_mem(&mut self, addr: u16) {
        let data = self.read(addr);
        let carry_out = data & 1 != 0;
        let result = data >> 1 | (self.flags.carry as u8) << 7;
        self.write(addr, result);
        self.update_zero_neg(result);
        self.flags.carry = carry_out;
    }

    fn bit(&mut self, addr: u16) {
        let data = self.read(addr);
        self.flags.negative = data & 0x80 != 0;
        self.flags.overflow = data & 0x40 != 0;
        self.flags.zero = data & self.a == 0;
    }

    fn compare_with(&mut self, addr: u16, reg: u8) {
        let data = self.read(addr);
        self.flags.carry = data <= reg;
        self.update_zero_neg(reg.wrapping_sub(data));
    }

    /// Taken branches cost one extra cycle, two when the target lands
    /// on a different page than the instruction's end.
    fn branch_cond(&mut self, cond: bool) {
        if cond {
            let offset = self.read(self.pc) as i8;
            self.pc = self.pc.wrapping_add(1);
            let target = self.pc.wrapping_add(offset as u16);
            self.cycles += 1;
            if target & 0xFF00 != self.pc & 0xFF00 {
                self.cycles += 1;
            }
            self.pc = target;
        }
    }

    fn dec(&mut self, addr: u16) {
        let data = self.read(addr).wrapping_sub(1);
        self.write(addr, data);
        self.update_zero_neg(data);
    }

    fn inc(&mut self, addr: u16) {
        let data = self.read(addr).wrapping_add(1);
        self.write(addr, data);
        self.update_zero_neg(data);
    }

    fn lax(&mut self, addr: u16) {
        let data = self.read(addr);
        self.a = data;
        self.x = data;
        self.update_zero_neg(data);
    }

    // The break flag only exists in the pushed byte; PHP forces it and
    // the reserved bit on.
    fn php(&mut self) {
        let bits = self.flags.bits() | 0b0011_0000;
        self.stack_push(bits);
    }

    /// BRK pushes PC+1: the byte after the opcode is padding that the
    /// return address silently skips.
    fn brk(&mut self) {
        let ret = self.pc.wrapping_add(1);
        self.stack_push16(ret);
        let bits = self.flags.bits() | 0b0001_0000;
        self.stack_push(bits);
        self.flags.interrupt_disable = true;
        self.pc = self.read16(IRQ_VECTOR);
    }

    /// Hardware interrupt entry: unlike BRK this pushes PC as-is.
    fn interrupt(&mut self, vector: u16) {
        let pc = self.pc;
        self.stack_push16(pc);
        let bits = self.flags.bits();
        self.stack_push(bits);
        self.flags.interrupt_disable = true;
        self.pc = self.read16(vector);
    }
}
