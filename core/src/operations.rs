use crate::chip8::Chip8;
use crate::constants::{GLYPH_SIZE, MEMORY_SIZE, STACK_DEPTH};
use crate::error::Fault;
use crate::instruction::Instruction;

/// Execution of decoded instructions.
///
/// Every instruction either advances the PC by 2 itself or sets it
/// explicitly; skip instructions advance by 4. Register arithmetic wraps
/// modulo 256. The index register and every I-relative memory access wrap
/// modulo 4096 so no program can index outside the address space.
impl Chip8 {
    pub(crate) fn execute(&mut self, instruction: Instruction) -> Result<(), Fault> {
        match instruction {
            Instruction::Clear => self.clear(),
            Instruction::Return => self.ret()?,
            Instruction::Jump { nnn } => self.jump(nnn),
            Instruction::Call { nnn } => self.call(nnn)?,
            Instruction::SkipEqual { x, nn } => self.skip_if(self.v(x) == nn),
            Instruction::SkipNotEqual { x, nn } => self.skip_if(self.v(x) != nn),
            Instruction::SkipRegisterEqual { x, y } => self.skip_if(self.v(x) == self.v(y)),
            Instruction::Load { x, nn } => self.load(x, nn),
            Instruction::Add { x, nn } => self.add(x, nn),
            Instruction::Move { x, y } => self.load(x, self.v(y)),
            Instruction::Or { x, y } => self.load(x, self.v(x) | self.v(y)),
            Instruction::And { x, y } => self.load(x, self.v(x) & self.v(y)),
            Instruction::Xor { x, y } => self.load(x, self.v(x) ^ self.v(y)),
            Instruction::AddRegister { x, y } => self.add_register(x, y),
            Instruction::Sub { x, y } => self.sub(x, y),
            Instruction::ShiftRight { x, y } => self.shift_right(x, y),
            Instruction::SubNegated { x, y } => self.sub_negated(x, y),
            Instruction::ShiftLeft { x, y } => self.shift_left(x, y),
            Instruction::SkipRegisterNotEqual { x, y } => self.skip_if(self.v(x) != self.v(y)),
            Instruction::LoadIndex { nnn } => self.load_index(nnn),
            Instruction::JumpOffset { nnn } => self.jump_offset(nnn),
            Instruction::Random { x, nn } => self.random(x, nn),
            Instruction::Draw { x, y, n } => self.draw(x, y, n),
            Instruction::SkipPressed { x } => self.skip_if(self.key_pressed(x)),
            Instruction::SkipNotPressed { x } => self.skip_if(!self.key_pressed(x)),
            Instruction::ReadDelay { x } => self.load(x, self.state.delay_timer),
            Instruction::WaitKey { x } => self.wait_key(x),
            Instruction::SetDelay { x } => self.set_delay(x),
            Instruction::SetSound { x } => self.set_sound(x),
            Instruction::AddIndex { x } => self.add_index(x),
            Instruction::LoadGlyph { x } => self.load_glyph(x),
            Instruction::StoreBcd { x } => self.store_bcd(x),
            Instruction::StoreRegisters { x } => self.store_registers(x),
            Instruction::ReadRegisters { x } => self.read_registers(x),
            Instruction::Unknown(op) => self.unknown(op)?,
        }
        Ok(())
    }

    /// clear the frame buffer and request a redraw
    fn clear(&mut self) {
        self.state.frame_buffer.clear();
        self.state.draw_flag = true;
        self.advance();
    }

    /// PC = STACK.pop() + 2
    fn ret(&mut self) -> Result<(), Fault> {
        if self.state.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.state.sp -= 1;
        self.state.pc = self.state.stack[self.state.sp].wrapping_add(0x2);
        Ok(())
    }

    /// PC = nnn
    fn jump(&mut self, nnn: u16) {
        self.state.pc = nnn;
    }

    /// STACK.push(PC); PC = nnn
    /// Pushes the address of the CALL itself; RET adds 2 when popping.
    fn call(&mut self, nnn: u16) -> Result<(), Fault> {
        if self.state.sp == STACK_DEPTH {
            return Err(Fault::StackOverflow);
        }
        self.state.stack[self.state.sp] = self.state.pc;
        self.state.sp += 1;
        self.state.pc = nnn;
        Ok(())
    }

    /// Vx = nn
    fn load(&mut self, x: u8, nn: u8) {
        self.state.v[x as usize] = nn;
        self.advance();
    }

    /// Vx += nn; overflow is implicitly dropped
    fn add(&mut self, x: u8, nn: u8) {
        self.state.v[x as usize] = self.v(x).wrapping_add(nn);
        self.advance();
    }

    /// Vx += Vy; VF = carry
    fn add_register(&mut self, x: u8, y: u8) {
        let (res, carry) = self.v(x).overflowing_add(self.v(y));
        self.state.v[0xF] = carry.into();
        self.state.v[x as usize] = res;
        self.advance();
    }

    /// Vx -= Vy; VF = !borrow
    fn sub(&mut self, x: u8, y: u8) {
        let (res, borrow) = self.v(x).overflowing_sub(self.v(y));
        self.state.v[0xF] = (!borrow).into();
        self.state.v[x as usize] = res;
        self.advance();
    }

    /// Vx = Vy >> 1; VF = the bit shifted out
    fn shift_right(&mut self, x: u8, y: u8) {
        let vy = self.v(y);
        self.state.v[0xF] = vy & 0x1;
        self.state.v[x as usize] = vy >> 1;
        self.advance();
    }

    /// Vx = Vy - Vx; VF = !borrow
    fn sub_negated(&mut self, x: u8, y: u8) {
        let (res, borrow) = self.v(y).overflowing_sub(self.v(x));
        self.state.v[0xF] = (!borrow).into();
        self.state.v[x as usize] = res;
        self.advance();
    }

    /// Vy <<= 1; Vx = Vy; VF = the bit shifted out
    fn shift_left(&mut self, x: u8, y: u8) {
        let vy = self.v(y);
        self.state.v[0xF] = vy >> 7;
        self.state.v[y as usize] = vy << 1;
        self.state.v[x as usize] = vy << 1;
        self.advance();
    }

    /// I = nnn
    fn load_index(&mut self, nnn: u16) {
        self.state.i = nnn;
        self.advance();
    }

    /// PC = nnn + V0
    fn jump_offset(&mut self, nnn: u16) {
        self.state.pc = nnn.wrapping_add(u16::from(self.v(0x0)));
    }

    /// Vx = random_byte & nn
    fn random(&mut self, x: u8, nn: u8) {
        let byte = (self.rng.next_u32() & 0xFF) as u8;
        self.state.v[x as usize] = byte & nn;
        self.advance();
    }

    /// draw_sprite(x=Vx y=Vy rows=n)
    /// XORs the n-row sprite at memory[I..I+n) onto the frame buffer at
    /// (Vx, Vy) with wrapping. VF = 1 if any lit pixel was erased.
    fn draw(&mut self, x: u8, y: u8, n: u8) {
        let origin_x = self.v(x) as usize;
        let origin_y = self.v(y) as usize;
        self.state.v[0xF] = 0x0;

        for row in 0..n as usize {
            let sprite = self.state.memory[(self.state.i as usize + row) % MEMORY_SIZE];
            for bit in 0..8 {
                if sprite >> (7 - bit) & 0x1 == 0x1
                    && self.state.frame_buffer.flip(origin_x + bit, origin_y + row)
                {
                    self.state.v[0xF] = 0x1;
                }
            }
        }

        self.state.draw_flag = true;
        self.advance();
    }

    /// hold the PC on this instruction until a key press arrives, then
    /// store the key in Vx and advance
    fn wait_key(&mut self, x: u8) {
        if let Some(key) = self.last_pressed.take() {
            self.state.v[x as usize] = key;
            self.advance();
        }
    }

    /// DT = Vx
    fn set_delay(&mut self, x: u8) {
        self.state.delay_timer = self.v(x);
        self.advance();
    }

    /// ST = Vx
    fn set_sound(&mut self, x: u8) {
        self.state.sound_timer = self.v(x);
        self.advance();
    }

    /// I += Vx, wrapped modulo 4096
    fn add_index(&mut self, x: u8) {
        self.state.i = self.state.i.wrapping_add(u16::from(self.v(x))) & 0x0FFF;
        self.advance();
    }

    /// I = the address of the sprite sheet glyph for the low nibble of Vx
    fn load_glyph(&mut self, x: u8) {
        self.state.i = u16::from(self.v(x) & 0xF) * GLYPH_SIZE;
        self.advance();
    }

    /// mem[I..I+3] = the hundreds, tens, and ones digits of Vx
    fn store_bcd(&mut self, x: u8) {
        let vx = self.v(x);
        let bcd = [vx / 100, vx / 10 % 10, vx % 10];
        for (offset, digit) in bcd.iter().enumerate() {
            self.state.memory[(self.state.i as usize + offset) % MEMORY_SIZE] = *digit;
        }
        self.advance();
    }

    /// mem[I..=I+x] = V0..=Vx; I += x + 1
    fn store_registers(&mut self, x: u8) {
        for offset in 0..=x as usize {
            self.state.memory[(self.state.i as usize + offset) % MEMORY_SIZE] =
                self.state.v[offset];
        }
        self.state.i = self.state.i.wrapping_add(u16::from(x) + 1) & 0x0FFF;
        self.advance();
    }

    /// V0..=Vx = mem[I..=I+x]; I += x + 1
    fn read_registers(&mut self, x: u8) {
        for offset in 0..=x as usize {
            self.state.v[offset] = self.state.memory[(self.state.i as usize + offset) % MEMORY_SIZE];
        }
        self.state.i = self.state.i.wrapping_add(u16::from(x) + 1) & 0x0FFF;
        self.advance();
    }

    /// permissive mode logs and skips; strict mode halts
    fn unknown(&mut self, op: u16) -> Result<(), Fault> {
        if self.strict {
            return Err(Fault::IllegalOpcode(op));
        }
        log::warn!("unknown opcode {:04X}; treating as a no-op", op);
        self.advance();
        Ok(())
    }

    fn v(&self, register: u8) -> u8 {
        self.state.v[register as usize]
    }

    /// whether the key selected by the low nibble of Vx is pressed
    fn key_pressed(&self, x: u8) -> bool {
        self.keypad[(self.v(x) & 0xF) as usize]
    }

    fn advance(&mut self) {
        self.state.pc = self.state.pc.wrapping_add(0x2);
    }

    /// pc += 4 to skip the next instruction, else pc += 2
    fn skip_if(&mut self, condition: bool) {
        let offset = if condition { 0x4 } else { 0x2 };
        self.state.pc = self.state.pc.wrapping_add(offset);
    }
}
