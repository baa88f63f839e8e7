fn main() {
    pipefmt::main()
}
